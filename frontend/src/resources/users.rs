use serde::Deserialize;
use yew::prelude::*;

use crate::api::{ApiClient, ApiError, Method, Service, Transport};
use crate::models::{decode_item, loose_string};
use crate::resource::{Draft, FieldKind, FieldSpec, Resource};
use crate::session::Role;

const ROLES: &[(&str, &str)] = &[("client", "Client"), ("admin", "Admin")];

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id", deserialize_with = "loose_string")]
    pub id: String,
    #[serde(deserialize_with = "loose_string")]
    pub username: String,
    #[serde(deserialize_with = "loose_string")]
    pub email: String,
    #[serde(deserialize_with = "loose_string")]
    pub full_name: String,
    #[serde(deserialize_with = "loose_string")]
    pub role: String,
    pub cars: Option<Vec<String>>,
    pub created_at: Option<String>,
}

impl Resource for User {
    const SINGULAR: &'static str = "User";
    const PLURAL: &'static str = "Users";
    const SERVICE: Service = Service::Identity;
    const LIST_KEY: &'static str = "users";
    const ITEM_KEY: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn fields(_audience: Role) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("username", "Username", FieldKind::Text),
            FieldSpec::new("email", "Email", FieldKind::Email),
            FieldSpec::new("fullName", "Full Name", FieldKind::Text),
            FieldSpec::new("role", "Role", FieldKind::Select(ROLES)).with_default("client"),
        ]
    }

    fn to_draft(&self) -> Draft {
        Draft::default()
            .with_text("username", &self.username)
            .with_text("email", &self.email)
            .with_text("fullName", &self.full_name)
            .with_text("role", &self.role)
    }

    fn summary(&self) -> Html {
        let cars = self.cars.as_deref().unwrap_or_default().join(", ");
        html! {
            <div>
                <p><strong>{ &self.full_name }</strong></p>
                <p>{ format!("Email: {}", self.email) }</p>
                <p>{ format!("Username: {}", self.username) }</p>
                <p>{ format!("Role: {}", self.role) }</p>
                <p>{ format!("Cars: {cars}") }</p>
            </div>
        }
    }

    fn list_path(_owner: Option<&str>) -> String {
        "/admin/users".into()
    }

    fn create_path() -> String {
        "/admin/users".into()
    }

    fn item_path(id: &str) -> String {
        format!("/users/{id}")
    }
}

/// `GET /profile`: the account behind the client's token.
pub async fn fetch_profile<T: Transport>(client: &ApiClient<T>) -> Result<User, ApiError> {
    let value = client
        .authed(Method::GET, Service::Identity, "/profile", None)
        .await?;
    decode_item(value, "user")
}
