use crate::user::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// A login request with an email and password.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// What the API answers to a successful login or registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
    pub user: User,
}

crate::impl_payload!(AuthResponse);
