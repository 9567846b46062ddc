use serde::Deserialize;
use yew::prelude::*;

use crate::api::Service;
use crate::models::loose_string;
use crate::resource::{Draft, FieldKind, FieldSpec, Resource};
use crate::session::Role;
use crate::utils::{date_input_value, format_date, short_id};

const PAYMENT_METHODS: &[(&str, &str)] = &[
    ("", "Select a payment method"),
    ("credit_card", "Credit Card"),
    ("debit_card", "Debit Card"),
    ("cash", "Cash"),
    ("bank_transfer", "Bank Transfer"),
];

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bill {
    #[serde(rename = "_id", alias = "id", deserialize_with = "loose_string")]
    pub id: String,
    #[serde(deserialize_with = "loose_string")]
    pub client_id: String,
    #[serde(deserialize_with = "loose_string")]
    pub reservation_id: String,
    #[serde(deserialize_with = "loose_string")]
    pub amount: String,
    pub is_paid: bool,
    pub payment_date: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub payment_method: String,
    pub created_at: Option<String>,
}

impl Resource for Bill {
    const SINGULAR: &'static str = "Bill";
    const PLURAL: &'static str = "Bills";
    const SERVICE: Service = Service::Billing;
    const LIST_KEY: &'static str = "bills";
    const ITEM_KEY: &'static str = "bill";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn fields(_audience: Role) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("clientId", "Client ID", FieldKind::Text),
            FieldSpec::new("amount", "Amount", FieldKind::Number),
            FieldSpec::new("isPaid", "Is Paid", FieldKind::Flag),
            FieldSpec::new("paymentDate", "Payment Date", FieldKind::Date).optional(),
            FieldSpec::new("paymentMethod", "Payment Method", FieldKind::Select(PAYMENT_METHODS)),
        ]
    }

    fn to_draft(&self) -> Draft {
        Draft::default()
            .with_text("clientId", &self.client_id)
            .with_text("amount", &self.amount)
            .with_flag("isPaid", self.is_paid)
            .with_text("paymentDate", self.payment_date.as_deref().map(date_input_value).unwrap_or_default())
            .with_text("paymentMethod", &self.payment_method)
    }

    fn summary(&self) -> Html {
        html! {
            <div>
                <p><strong>{ format!("Bill #{}", short_id(&self.id)) }</strong></p>
                if !self.reservation_id.is_empty() {
                    <p>{ format!("Reservation ID: {}", self.reservation_id) }</p>
                }
                <p>{ format!("Client ID: {}", self.client_id) }</p>
                <p>{ format!("Amount: ${}", self.amount) }</p>
                <p>{ format!("Payment Method: {}", self.payment_method) }</p>
                <p>{ format!("Status: {}", if self.is_paid { "Paid" } else { "Unpaid" }) }</p>
                if let Some(date) = self.payment_date.as_deref().filter(|d| !d.is_empty()) {
                    <p>{ format!("Payment Date: {}", format_date(date)) }</p>
                }
            </div>
        }
    }

    fn list_path(_owner: Option<&str>) -> String {
        "/bill".into()
    }

    fn create_path() -> String {
        "/bill".into()
    }

    fn item_path(id: &str) -> String {
        format!("/bill/{id}")
    }

    /// Clients can only look at and delete their bills.
    fn editable_by(audience: Role) -> bool {
        audience == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::api::mock::harness;
    use crate::resource::{load, submit, Submitted};
    use crate::session::Session;

    #[test]
    fn wrapped_bill_list_is_accepted() {
        let session = Session::in_memory();
        session.login(Role::User, "jwt").unwrap();
        let h = harness(&session, Role::User);
        h.transport.reply(200, json!({ "bills": [{ "_id": "b1", "amount": 40, "isPaid": true }] }));

        let bills = block_on(load::<Bill, _>(&h.client, None)).unwrap();

        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].amount, "40");
        assert!(bills[0].is_paid);
    }

    #[test]
    fn admin_bill_is_sent_with_typed_members() {
        let session = Session::in_memory();
        session.login(Role::Admin, "adm").unwrap();
        let h = harness(&session, Role::Admin);
        h.transport.reply(201, json!({ "bill": { "_id": "b9", "amount": 75 } }));

        let draft = Draft::defaults(&Bill::fields(Role::Admin))
            .with_text("clientId", "c1")
            .with_text("amount", "75")
            .with_flag("isPaid", true)
            .with_text("paymentMethod", "cash");

        let out = block_on(submit::<Bill, _>(&h.client, None, &draft, None)).unwrap();

        assert!(matches!(out, Submitted::Created(ref b) if b.id == "b9"));
        let sent: serde_json::Value = serde_json::from_str(h.transport.calls()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            sent,
            json!({ "clientId": "c1", "amount": 75, "isPaid": true, "paymentDate": "", "paymentMethod": "cash" })
        );
    }

    #[test]
    fn only_admins_edit_bills() {
        assert!(!Bill::editable_by(Role::User));
        assert!(Bill::editable_by(Role::Admin));
    }
}
