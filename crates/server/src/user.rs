//! Account endpoints: login, registration and password change.

use api_types::{
    Message,
    user::{ChangePassword, Login, Register, UserResponse, UserView},
};
use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use engine::{Registration, User};

use crate::{ServerError, server::ServerState};

fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        role_id: user.role_id,
        name: user.name,
        email: user.email,
        organization: user.organization,
        whatsapp: user.whatsapp,
    }
}

pub async fn login(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Login>, ServerError>,
) -> Result<Json<UserResponse>, ServerError> {
    let user = state
        .engine
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(UserResponse {
        message: "login success".to_string(),
        user: user_view(user),
    }))
}

pub async fn register(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Register>, ServerError>,
) -> Result<Json<UserResponse>, ServerError> {
    let user = state
        .engine
        .register(Registration {
            organization: payload.organization,
            name: payload.name,
            email: payload.email,
            whatsapp: payload.whatsapp,
            password: payload.password,
        })
        .await?;

    Ok(Json(UserResponse {
        message: "register success".to_string(),
        user: user_view(user),
    }))
}

pub async fn change_password(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<ChangePassword>, ServerError>,
) -> Result<Json<Message>, ServerError> {
    state
        .engine
        .change_password(
            payload.user_id,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    Ok(Json(Message::new("password updated")))
}
