//! Fixed-shape convenience calls.
//!
//! Each endpoint is a request constructor plus an extractor for the field
//! it returns, so the async and blocking clients stay one-liners over
//! their send loops.

use crate::{AsyncHttpApi, BlockingTransport, HttpApi, Transport};
use matrix_api_core::ApiRequest;
use matrix_api_error::{JsonError, MatrixApiResult};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Value as JsonValue, json};

/// Bytes left as-is in a path segment; everything else is `%XX` encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn display_name_request(user_id: &str) -> ApiRequest {
    ApiRequest::get(format!("/profile/{}/displayname", user_id))
}

fn set_display_name_request(user_id: &str, display_name: &str) -> ApiRequest {
    ApiRequest::put(format!("/profile/{}/displayname", user_id))
        .with_json(json!({ "displayname": display_name }))
}

fn avatar_url_request(user_id: &str) -> ApiRequest {
    ApiRequest::get(format!("/profile/{}/avatar_url", user_id))
}

fn room_id_request(room_alias: &str) -> ApiRequest {
    ApiRequest::get(format!(
        "/directory/room/{}",
        utf8_percent_encode(room_alias, PATH_SEGMENT)
    ))
}

fn room_members_request(room_id: &str) -> ApiRequest {
    ApiRequest::get(format!("/rooms/{}/members", room_id))
}

fn event_in_room_request(room_id: &str, event_id: &str) -> ApiRequest {
    ApiRequest::get(format!("/rooms/{}/event/{}", room_id, event_id))
}

#[track_caller]
fn string_field(body: &JsonValue, field: &str) -> MatrixApiResult<String> {
    body.get(field)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| JsonError::new(format!("Response has no string field '{}'", field)).into())
}

/// Display name of `user_id` from a room members response.
fn member_display_name(members: &JsonValue, user_id: &str) -> Option<String> {
    members
        .get("chunk")?
        .as_array()?
        .iter()
        .find(|event| event.get("sender").and_then(JsonValue::as_str) == Some(user_id))?
        .get("content")?
        .get("displayname")?
        .as_str()
        .map(str::to_string)
}

impl<T: Transport> AsyncHttpApi<T> {
    /// Get a user's global display name.
    pub async fn get_display_name(&self, user_id: &str) -> MatrixApiResult<String> {
        let body = self.send(display_name_request(user_id)).await?;
        string_field(&body, "displayname")
    }

    /// Set a user's global display name.
    pub async fn set_display_name(&self, user_id: &str, display_name: &str) -> MatrixApiResult<JsonValue> {
        self.send(set_display_name_request(user_id, display_name)).await
    }

    /// Get a user's avatar `mxc://` URL.
    pub async fn get_avatar_url(&self, user_id: &str) -> MatrixApiResult<String> {
        let body = self.send(avatar_url_request(user_id)).await?;
        string_field(&body, "avatar_url")
    }

    /// Resolve a room alias such as `#ops:example.org` to a room id.
    pub async fn get_room_id(&self, room_alias: &str) -> MatrixApiResult<String> {
        let body = self.send(room_id_request(room_alias)).await?;
        string_field(&body, "room_id")
    }

    /// Member events of a room.
    pub async fn get_room_members(&self, room_id: &str) -> MatrixApiResult<JsonValue> {
        self.send(room_members_request(room_id)).await
    }

    /// Display name `user_id` uses in `room_id`, if they have one there.
    pub async fn get_room_displayname(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> MatrixApiResult<Option<String>> {
        let members = self.get_room_members(room_id).await?;
        Ok(member_display_name(&members, user_id))
    }

    /// Fetch a single event by room and event id.
    pub async fn get_event_in_room(&self, room_id: &str, event_id: &str) -> MatrixApiResult<JsonValue> {
        self.send(event_in_room_request(room_id, event_id)).await
    }
}

impl<T: BlockingTransport> HttpApi<T> {
    /// Get a user's global display name.
    pub fn get_display_name(&self, user_id: &str) -> MatrixApiResult<String> {
        let body = self.send(display_name_request(user_id))?;
        string_field(&body, "displayname")
    }

    /// Set a user's global display name.
    pub fn set_display_name(&self, user_id: &str, display_name: &str) -> MatrixApiResult<JsonValue> {
        self.send(set_display_name_request(user_id, display_name))
    }

    /// Get a user's avatar `mxc://` URL.
    pub fn get_avatar_url(&self, user_id: &str) -> MatrixApiResult<String> {
        let body = self.send(avatar_url_request(user_id))?;
        string_field(&body, "avatar_url")
    }

    /// Resolve a room alias to a room id.
    pub fn get_room_id(&self, room_alias: &str) -> MatrixApiResult<String> {
        let body = self.send(room_id_request(room_alias))?;
        string_field(&body, "room_id")
    }

    /// Member events of a room.
    pub fn get_room_members(&self, room_id: &str) -> MatrixApiResult<JsonValue> {
        self.send(room_members_request(room_id))
    }

    /// Display name `user_id` uses in `room_id`, if they have one there.
    pub fn get_room_displayname(&self, room_id: &str, user_id: &str) -> MatrixApiResult<Option<String>> {
        let members = self.get_room_members(room_id)?;
        Ok(member_display_name(&members, user_id))
    }

    /// Fetch a single event by room and event id.
    pub fn get_event_in_room(&self, room_id: &str, event_id: &str) -> MatrixApiResult<JsonValue> {
        self.send(event_in_room_request(room_id, event_id))
    }
}
