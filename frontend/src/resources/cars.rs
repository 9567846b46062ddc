use serde::Deserialize;
use yew::prelude::*;

use crate::api::Service;
use crate::models::loose_string;
use crate::resource::{Draft, FieldKind, FieldSpec, Resource};
use crate::session::Role;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Car {
    #[serde(rename = "_id", alias = "id", deserialize_with = "loose_string")]
    pub id: String,
    #[serde(deserialize_with = "loose_string")]
    pub make: String,
    #[serde(deserialize_with = "loose_string")]
    pub model: String,
    /// Kept as text: the inventory service answers with numbers or strings.
    #[serde(deserialize_with = "loose_string")]
    pub year: String,
    #[serde(deserialize_with = "loose_string")]
    pub color: String,
    #[serde(deserialize_with = "loose_string")]
    pub client_id: String,
    pub created_at: Option<String>,
}

impl Resource for Car {
    const SINGULAR: &'static str = "Car";
    const PLURAL: &'static str = "Cars";
    const SERVICE: Service = Service::Inventory;
    const LIST_KEY: &'static str = "cars";
    const ITEM_KEY: &'static str = "car";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn fields(_audience: Role) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("make", "Make", FieldKind::Text),
            FieldSpec::new("model", "Model", FieldKind::Text),
            FieldSpec::new("year", "Year", FieldKind::Number),
            FieldSpec::new("color", "Color", FieldKind::Text),
        ]
    }

    fn to_draft(&self) -> Draft {
        Draft::default()
            .with_text("make", &self.make)
            .with_text("model", &self.model)
            .with_text("year", &self.year)
            .with_text("color", &self.color)
    }

    fn summary(&self) -> Html {
        html! {
            <div>
                <p><strong>{ format!("{} {}", self.make, self.model) }</strong></p>
                <p>{ format!("Year: {}", self.year) }</p>
                <p>{ format!("Color: {}", self.color) }</p>
            </div>
        }
    }

    fn list_path(owner: Option<&str>) -> String {
        format!("/cars/{}", owner.unwrap_or_default())
    }

    fn create_path() -> String {
        "/cars".into()
    }

    fn item_path(id: &str) -> String {
        format!("/cars/{id}")
    }

    fn owned_by(audience: Role) -> bool {
        audience == Role::User
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::api::mock::harness;
    use crate::api::{ApiError, Method};
    use crate::resource::load_scoped;
    use crate::session::Session;

    #[test]
    fn cars_are_scoped_to_the_profile_id() {
        let session = Session::in_memory();
        session.login(Role::User, "jwt").unwrap();
        let h = harness(&session, Role::User);
        h.transport
            .reply(200, json!({ "user": { "_id": "client-9" } }))
            .reply(200, json!([{ "_id": "k1", "make": "Skoda", "year": 2018 }]));

        let loaded = block_on(load_scoped::<Car, _>(&h.client)).unwrap();

        assert_eq!(loaded.owner.as_deref(), Some("client-9"));
        assert_eq!(loaded.records[0].year, "2018");
        let calls = h.transport.calls();
        assert_eq!(calls[0].url, "https://identity.test/api/profile");
        assert_eq!(calls[1].url, "https://inventory.test/cars/client-9");
        assert_eq!(calls[1].method, Method::GET);
    }

    #[test]
    fn cars_view_without_token_makes_no_call() {
        let session = Session::in_memory();
        let h = harness(&session, Role::User);

        assert!(block_on(load_scoped::<Car, _>(&h.client)).is_err());
        assert!(h.transport.calls().is_empty());
        assert_eq!(*h.redirects.borrow(), vec![Role::User]);
        assert_eq!(Role::User.login_route(), "/");
    }

    #[test]
    fn profile_without_id_never_lists_every_car() {
        let session = Session::in_memory();
        session.login(Role::User, "jwt").unwrap();
        let h = harness(&session, Role::User);
        h.transport.reply(200, json!({ "user": { "username": "ana", "_id": "  " } }));

        let err = block_on(load_scoped::<Car, _>(&h.client)).unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
        let calls = h.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://identity.test/api/profile");
    }
}
