//! Wire DTOs for the auth API.
//!
//! Request bodies borrow from the domain request so secrets are never copied.
//! Response bodies decode into DTOs first and map into [`User`] in one pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{SignInCredentials, SignUpRequest, SocialToken, User, UserId, UserProfile};

#[derive(Debug, Serialize)]
pub(super) struct SignUpBody<'a> {
    user: SignUpUserDto<'a>,
}

#[derive(Debug, Serialize)]
struct SignUpUserDto<'a> {
    username: &'a str,
    email: &'a str,
    gender: &'a str,
    password: &'a str,
    password_confirmation: &'a str,
}

impl<'a> From<&'a SignUpRequest> for SignUpBody<'a> {
    fn from(value: &'a SignUpRequest) -> Self {
        Self {
            user: SignUpUserDto {
                username: value.username(),
                email: value.email(),
                gender: value.gender(),
                password: value.password(),
                password_confirmation: value.password_confirmation(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SignInBody<'a> {
    user: SignInUserDto<'a>,
}

#[derive(Debug, Serialize)]
struct SignInUserDto<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a SignInCredentials> for SignInBody<'a> {
    fn from(value: &'a SignInCredentials) -> Self {
        Self {
            user: SignInUserDto {
                email: value.email(),
                password: value.password(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SocialSignInBody<'a> {
    access_token: &'a str,
}

impl<'a> From<&'a SocialToken> for SocialSignInBody<'a> {
    fn from(value: &'a SocialToken) -> Self {
        Self {
            access_token: value.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserEnvelopeDto {
    user: UserDto,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdDto {
    Text(String),
    Number(u64),
}

#[derive(Debug, Deserialize)]
struct UserDto {
    id: IdDto,
    #[serde(default)]
    email: String,
    #[serde(default, alias = "firstName")]
    first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    last_name: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl UserEnvelopeDto {
    pub(super) fn into_domain_user(self) -> Result<User, String> {
        let UserDto {
            id,
            email,
            first_name,
            last_name,
            gender,
            username,
            password,
        } = self.user;
        let raw_id = match id {
            IdDto::Text(text) => text,
            IdDto::Number(number) => number.to_string(),
        };
        let id = UserId::new(raw_id).map_err(|err| format!("user id: {err}"))?;
        let user = User::new(
            id,
            UserProfile {
                email,
                first_name: first_name.unwrap_or_default(),
                last_name: last_name.unwrap_or_default(),
                gender: gender.unwrap_or_default(),
                username: username.unwrap_or_default(),
            },
        );
        Ok(match password {
            Some(password) => user.with_password(password),
            None => user,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBodyDto {
    errors: Option<Value>,
    error: Option<Value>,
    message: Option<String>,
}

/// Reduce an error body to one readable message, if it carries any text.
///
/// Accepted shapes: `{"errors": [..]}`, `{"errors": {"field": [..]}}`,
/// `{"error": ".."}` and `{"message": ".."}`.
pub(super) fn error_message(body: &[u8]) -> Option<String> {
    let dto: ErrorBodyDto = serde_json::from_slice(body).ok()?;
    let parts = dto
        .errors
        .as_ref()
        .map(readable_parts)
        .filter(|parts| !parts.is_empty())
        .or_else(|| dto.error.as_ref().map(readable_parts))
        .filter(|parts| !parts.is_empty())
        .or_else(|| {
            dto.message
                .as_deref()
                .map(|message| message.trim())
                .filter(|message| !message.is_empty())
                .map(|message| vec![message.to_owned()])
        })?;
    Some(parts.join(" "))
}

/// Non-blank, trimmed messages found in `value`.
fn readable_parts(value: &Value) -> Vec<String> {
    collect_error_text(value)
        .into_iter()
        .map(|part| part.trim().to_owned())
        .filter(|part| !part.is_empty())
        .collect()
}

fn collect_error_text(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items.iter().flat_map(collect_error_text).collect(),
        Value::Object(map) => {
            if let Some(full) = map.get("full_messages") {
                return collect_error_text(full);
            }
            map.iter()
                .flat_map(|(field, messages)| {
                    collect_error_text(messages)
                        .into_iter()
                        .filter(|message| !message.trim().is_empty())
                        .map(move |message| format!("{} {message}", humanise(field)))
                })
                .collect()
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => Vec::new(),
    }
}

fn humanise(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
