use serde::{Serialize, Deserialize};

/// A reading club record as stored and returned by the API
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Club {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_date: String,
    pub favorite_genre: String,
    pub members: i64,
}

/// Payload for creating a club (id and created_date are server-assigned)
#[derive(Debug, Deserialize, Clone)]
pub struct ClubCreate {
    pub name: String,
    pub description: String,
    pub favorite_genre: String,
    #[serde(default)]
    pub members: i64,
}

/// Payload for updating a club - only supplied fields change
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClubUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub favorite_genre: Option<String>,
    pub members: Option<i64>,
}

/// A club member record
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub joined_date: String,
}

/// Payload for adding a member to a club
#[derive(Debug, Deserialize, Clone)]
pub struct MemberCreate {
    pub name: String,
    pub email: String,
}

// Auth payloads

#[derive(Debug, Deserialize, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

/// Public view of a registered user (never carries the password hash)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Response for the root endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}
