use crate::{
    booking::Booking,
    device,
    device::{DevicePlatform, DeviceToken, RegisterDeviceRequest},
    middleware::auth_middleware,
    notification,
    notification::{
        Notification, NotificationChannel, NotificationStatus, NotificationStatusResponse,
        NotificationType, PendingNotification, ScheduleNotificationRequest,
        ScheduledNotificationResponse, SendNotificationRequest, SendNotificationResponse,
        SendWhatsAppRequest, SendWhatsAppResponse,
    },
    state::AppState,
    workshop::Workshop,
};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        notification::notification_handlers::schedule_notification,
        notification::notification_handlers::get_pending_notifications,
        notification::notification_handlers::send_notification,
        notification::notification_handlers::send_scheduled_notification,
        notification::notification_handlers::mark_notification_sent,
        notification::notification_handlers::delete_notification,
        notification::notification_handlers::send_whatsapp_message,
        device::device_handlers::register_device,
        device::device_handlers::deactivate_device,
    ),
    components(
        schemas(
            ScheduleNotificationRequest,
            ScheduledNotificationResponse,
            SendNotificationRequest,
            SendNotificationResponse,
            SendWhatsAppRequest,
            SendWhatsAppResponse,
            NotificationStatusResponse,
            RegisterDeviceRequest,
            Notification,
            NotificationType,
            NotificationChannel,
            NotificationStatus,
            PendingNotification,
            DeviceToken,
            DevicePlatform,
            Booking,
            Workshop,
        )
    ),
    tags(
        (name = "notifications", description = "Notification lifecycle endpoints"),
        (name = "whatsapp", description = "Direct WhatsApp delivery"),
        (name = "devices", description = "Push device token registry")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let notification_routes = Router::new()
        .route("/schedule", post(notification::schedule_notification))
        .route("/pending", get(notification::get_pending_notifications))
        .route("/send", post(notification::send_notification))
        .route("/:id/send", post(notification::send_scheduled_notification))
        .route("/:id/sent", put(notification::mark_notification_sent))
        .route("/:id", delete(notification::delete_notification))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let whatsapp_routes = Router::new()
        .route("/send", post(notification::send_whatsapp_message))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let device_routes = Router::new()
        .route("/", post(device::register_device))
        .route("/:fcm_token", delete(device::deactivate_device))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .nest("/notifications", notification_routes)
        .nest("/whatsapp", whatsapp_routes)
        .nest("/devices", device_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
