use serde::Deserialize;
use yew::prelude::*;

use crate::api::Service;
use crate::models::loose_string;
use crate::resource::{Draft, FieldKind, FieldSpec, Resource};
use crate::session::Role;
use crate::utils::{date_input_value, format_date, short_id};

const STATUSES: &[(&str, &str)] = &[
    ("", "Select a status"),
    ("pending", "Pending"),
    ("confirmed", "Confirmed"),
    ("cancelled", "Cancelled"),
    ("completed", "Completed"),
];

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reservation {
    #[serde(rename = "_id", alias = "id", deserialize_with = "loose_string")]
    pub id: String,
    #[serde(deserialize_with = "loose_string")]
    pub client_id: String,
    #[serde(deserialize_with = "loose_string")]
    pub car_id: String,
    #[serde(deserialize_with = "loose_string")]
    pub start_date: String,
    #[serde(deserialize_with = "loose_string")]
    pub end_date: String,
    #[serde(deserialize_with = "loose_string")]
    pub status: String,
    #[serde(deserialize_with = "loose_string")]
    pub total_price: String,
    pub created_at: Option<String>,
}

impl Resource for Reservation {
    const SINGULAR: &'static str = "Reservation";
    const PLURAL: &'static str = "Reservations";
    const SERVICE: Service = Service::Billing;
    const LIST_KEY: &'static str = "reservations";
    const ITEM_KEY: &'static str = "reservation";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn fields(audience: Role) -> Vec<FieldSpec> {
        let mut fields = Vec::with_capacity(6);
        if audience == Role::Admin {
            fields.push(FieldSpec::new("clientId", "Client ID", FieldKind::Text));
        }
        let status = match audience {
            Role::User => FieldSpec::new("status", "Status", FieldKind::Select(STATUSES)).with_default("pending"),
            Role::Admin => FieldSpec::new("status", "Status", FieldKind::Select(STATUSES)),
        };
        fields.extend([
            FieldSpec::new("carId", "Car ID", FieldKind::Text),
            FieldSpec::new("startDate", "Start Date", FieldKind::Date),
            FieldSpec::new("endDate", "End Date", FieldKind::Date),
            status,
            FieldSpec::new("totalPrice", "Total Price", FieldKind::Number),
        ]);
        fields
    }

    fn to_draft(&self) -> Draft {
        Draft::default()
            .with_text("clientId", &self.client_id)
            .with_text("carId", &self.car_id)
            .with_text("startDate", date_input_value(&self.start_date))
            .with_text("endDate", date_input_value(&self.end_date))
            .with_text("status", &self.status)
            .with_text("totalPrice", &self.total_price)
    }

    fn summary(&self) -> Html {
        html! {
            <div>
                <p><strong>{ format!("Reservation #{}", short_id(&self.id)) }</strong></p>
                <p>{ format!("Client ID: {}", self.client_id) }</p>
                <p>{ format!("Car ID: {}", self.car_id) }</p>
                <p>{ format!("Status: {}", self.status) }</p>
                <p>{ format!("Start Date: {}", format_date(&self.start_date)) }</p>
                <p>{ format!("End Date: {}", format_date(&self.end_date)) }</p>
                if !self.total_price.is_empty() {
                    <p>{ format!("Total Price: ${}", self.total_price) }</p>
                }
            </div>
        }
    }

    fn list_path(_owner: Option<&str>) -> String {
        "/reservation".into()
    }

    fn create_path() -> String {
        "/reservation".into()
    }

    fn item_path(id: &str) -> String {
        format!("/reservation/{id}")
    }

    fn owned_by(audience: Role) -> bool {
        audience == Role::User
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resource::{request_body, Draft};

    #[test]
    fn admin_form_adds_the_client_field() {
        let user: Vec<_> = Reservation::fields(Role::User).iter().map(|f| f.name).collect();
        let admin: Vec<_> = Reservation::fields(Role::Admin).iter().map(|f| f.name).collect();

        assert_eq!(user, ["carId", "startDate", "endDate", "status", "totalPrice"]);
        assert_eq!(admin[0], "clientId");
        assert_eq!(Draft::defaults(&Reservation::fields(Role::User)).text("status"), "pending");
    }

    #[test]
    fn user_submission_is_stamped_with_the_owner() {
        let draft = Draft::defaults(&Reservation::fields(Role::User))
            .with_text("carId", "k1")
            .with_text("startDate", "2024-05-01")
            .with_text("endDate", "2024-05-03")
            .with_text("totalPrice", "150");

        let body = request_body::<Reservation>(&draft, Role::User, Some("c7"));

        assert_eq!(
            body,
            json!({
                "carId": "k1", "startDate": "2024-05-01", "endDate": "2024-05-03",
                "status": "pending", "totalPrice": 150, "clientId": "c7"
            })
        );
    }

    #[test]
    fn edit_draft_uses_input_dates() {
        let r: Reservation = serde_json::from_value(json!({
            "_id": "r1", "startDate": "2024-05-01T00:00:00.000Z", "totalPrice": 99.5
        }))
        .unwrap();

        let draft = r.to_draft();
        assert_eq!(draft.text("startDate"), "2024-05-01");
        assert_eq!(draft.text("totalPrice"), "99.5");
    }
}
