use log::{error, info};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;

use crate::api::{ApiClient, ApiError, Transport};
use crate::guard::full_navigation;
use crate::notice::{Loading, Notice};
use crate::resource::{deliver_if_alive, load, Resource};
use crate::resources::users::fetch_profile;
use crate::resources::{Bill, Reservation, User};
use crate::session::{use_session, Role};
use crate::utils::{format_date, parse_timestamp, short_id};
use crate::Route;

/* -------------------------------------------------------------------------- */
/*                                 agrégation                                 */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub profile: User,
    pub bill_count: usize,
    pub reservation_count: usize,
    pub latest_bill: Option<Bill>,
    pub latest_reservation: Option<Reservation>,
}

/// Record with the greatest `createdAt`. Ties keep the earliest in `records`;
/// missing or unreadable timestamps never win.
pub fn latest_by_created_at<R: Resource>(records: &[R]) -> Option<&R> {
    let mut best: Option<(chrono::DateTime<chrono::Utc>, &R)> = None;
    for record in records {
        let Some(ts) = record.created_at().and_then(parse_timestamp) else {
            continue;
        };
        match best {
            Some((current, _)) if ts <= current => {}
            _ => best = Some((ts, record)),
        }
    }
    best.map(|(_, record)| record)
}

/// Profile, then bills, then reservations. The first failure stops the chain.
pub async fn load_summary<T: Transport>(client: &ApiClient<T>) -> Result<Summary, ApiError> {
    let profile = fetch_profile(client).await?;
    let bills = load::<Bill, T>(client, None).await?;
    let reservations = load::<Reservation, T>(client, None).await?;

    Ok(Summary {
        latest_bill: latest_by_created_at(&bills).cloned(),
        latest_reservation: latest_by_created_at(&reservations).cloned(),
        bill_count: bills.len(),
        reservation_count: reservations.len(),
        profile,
    })
}

/* -------------------------------------------------------------------------- */
/*                                 composants                                 */
/* -------------------------------------------------------------------------- */

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let session = use_session();
    let summary = use_state(|| None::<Summary>);
    let alive = use_mut_ref(|| true);

    {
        let summary = summary.clone();
        let alive = alive.clone();
        use_effect_with((), move |_| {
            let client = ApiClient::browser(session, Role::User);
            let flag = alive.clone();
            spawn_local(async move {
                let result = load_summary(&client).await;
                deliver_if_alive(&flag, "dashboard", result, |result| match result {
                    Ok(s) => {
                        info!("dashboard ready for {}", s.profile.username);
                        summary.set(Some(s));
                    }
                    // the client already redirected on 401/403
                    Err(e) if e.is_unauthorized() => {}
                    Err(e) => {
                        error!("dashboard: {e}");
                        full_navigation(Role::User.login_route());
                    }
                });
            });
            move || *alive.borrow_mut() = false
        });
    }

    let Some(s) = (*summary).clone() else {
        return html! { <Loading /> };
    };

    html! {
        <section class="dashboard">
            <h2>{ format!("Welcome, {}!", s.profile.username) }</h2>
            <p>{ format!("Email: {}", s.profile.email) }</p>
            <p>{ format!("Full Name: {}", s.profile.full_name) }</p>

            <div class="dashboard-cards">
                <div class="card">
                    <h3>{ "Latest bill" }</h3>
                    {
                        match &s.latest_bill {
                            Some(bill) => html! {
                                <>
                                    <p>{ format!("Bill #{}", short_id(&bill.id)) }</p>
                                    <p>{ format!("Amount: ${}", bill.amount) }</p>
                                    <p>{ format!("Status: {}", if bill.is_paid { "Paid" } else { "Unpaid" }) }</p>
                                </>
                            },
                            None => html! { <p>{ "No bills yet." }</p> },
                        }
                    }
                    <p class="muted">{ format!("{} bill(s) in total", s.bill_count) }</p>
                    <Link<Route> to={Route::UserBills}>{ "All bills" }</Link<Route>>
                </div>

                <div class="card">
                    <h3>{ "Latest reservation" }</h3>
                    {
                        match &s.latest_reservation {
                            Some(r) => html! {
                                <>
                                    <p>{ format!("Reservation #{}", short_id(&r.id)) }</p>
                                    <p>{ format!("Status: {}", r.status) }</p>
                                    <p>{ format!("{} → {}", format_date(&r.start_date), format_date(&r.end_date)) }</p>
                                </>
                            },
                            None => html! { <p>{ "No reservations yet." }</p> },
                        }
                    }
                    <p class="muted">{ format!("{} reservation(s) in total", s.reservation_count) }</p>
                    <Link<Route> to={Route::UserReservations}>{ "All reservations" }</Link<Route>>
                </div>
            </div>
        </section>
    }
}

#[function_component(ProfileCard)]
pub fn profile_card() -> Html {
    let session = use_session();
    let profile = use_state(|| None::<Result<User, String>>);
    let alive = use_mut_ref(|| true);

    {
        let profile = profile.clone();
        let alive = alive.clone();
        use_effect_with((), move |_| {
            let client = ApiClient::browser(session, Role::User);
            let flag = alive.clone();
            spawn_local(async move {
                let result = fetch_profile(&client).await;
                deliver_if_alive(&flag, "profile", result, |result| {
                    if let Err(e) = &result {
                        error!("profile: {e}");
                    }
                    profile.set(Some(result.map_err(|e| e.to_string())));
                });
            });
            move || *alive.borrow_mut() = false
        });
    }

    match &*profile {
        None => html! { <Loading /> },
        Some(Err(message)) => html! {
            <Notice message={Some(message.clone())} />
        },
        Some(Ok(user)) => html! {
            <section class="profile-card">
                <h2>{ &user.full_name }</h2>
                <p>{ format!("Username: {}", user.username) }</p>
                <p>{ format!("Email: {}", user.email) }</p>
                <p>{ format!("Role: {}", user.role) }</p>
                if let Some(cars) = user.cars.as_ref().filter(|c| !c.is_empty()) {
                    <p>{ format!("Cars: {}", cars.join(", ")) }</p>
                }
                if let Some(since) = user.created_at.as_deref() {
                    <p class="muted">{ format!("Member since {}", format_date(since)) }</p>
                }
            </section>
        },
    }
}

#[function_component(AdminHome)]
pub fn admin_home() -> Html {
    html! {
        <section class="admin-home">
            <h2>{ "Admin portal" }</h2>
            <p>{ "Pick a collection to manage." }</p>
            <ul class="admin-links">
                <li><Link<Route> to={Route::AdminUsers}>{ "Users" }</Link<Route>></li>
                <li><Link<Route> to={Route::AdminBills}>{ "Bills" }</Link<Route>></li>
                <li><Link<Route> to={Route::AdminReservations}>{ "Reservations" }</Link<Route>></li>
            </ul>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::api::mock::harness;
    use crate::auth::sign_in;
    use crate::session::Session;

    fn bills(value: serde_json::Value) -> Vec<Bill> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn latest_bill_is_the_most_recent() {
        let list = bills(json!([
            { "id": 1, "createdAt": "2024-01-01" },
            { "id": 2, "createdAt": "2024-02-01" }
        ]));

        assert_eq!(latest_by_created_at(&list).map(|b| b.id.as_str()), Some("2"));
    }

    #[test]
    fn ties_keep_the_first_and_garbage_never_wins() {
        let list = bills(json!([
            { "_id": "a", "createdAt": "not a date" },
            { "_id": "b", "createdAt": "2024-03-01T10:00:00Z" },
            { "_id": "c", "createdAt": "2024-03-01T10:00:00.000Z" },
            { "_id": "d" }
        ]));

        assert_eq!(latest_by_created_at(&list).map(|b| b.id.as_str()), Some("b"));
        assert_eq!(latest_by_created_at::<Bill>(&[]), None);
    }

    #[test]
    fn login_then_dashboard_fetches_in_sequence() {
        let session = Session::in_memory();
        let h = harness(&session, Role::User);
        h.transport
            .reply(200, json!({ "token": "jwt-1" }))
            .reply(200, json!({ "user": { "_id": "c1", "username": "ana" } }))
            .reply(200, json!({ "bills": [
                { "_id": "b1", "createdAt": "2024-01-01" },
                { "_id": "b2", "createdAt": "2024-02-01" }
            ] }))
            .reply(200, json!([
                { "_id": "r1", "createdAt": "2024-04-02T09:00:00Z" },
                { "_id": "r2", "createdAt": "2024-03-30T09:00:00Z" }
            ]));

        block_on(sign_in(&h.client, "ana", "secret")).unwrap();
        assert_eq!(session.current_token(Role::User).as_deref(), Some("jwt-1"));

        let summary = block_on(load_summary(&h.client)).unwrap();

        assert_eq!(summary.profile.username, "ana");
        assert_eq!(summary.latest_bill.map(|b| b.id), Some("b2".to_string()));
        assert_eq!(summary.latest_reservation.map(|r| r.id), Some("r1".to_string()));
        assert_eq!(summary.bill_count, 2);

        let urls: Vec<_> = h.transport.calls().into_iter().map(|c| c.url).collect();
        assert_eq!(
            urls,
            [
                "https://identity.test/api/auth/login",
                "https://identity.test/api/profile",
                "https://billing.test/api/bill",
                "https://billing.test/api/reservation",
            ]
        );
        assert!(h.transport.calls()[1..].iter().all(|c| c.header("Authorization") == Some("Bearer jwt-1")));
    }

    #[test]
    fn failed_step_stops_the_chain() {
        let session = Session::in_memory();
        session.login(Role::User, "jwt").unwrap();
        let h = harness(&session, Role::User);
        h.transport
            .reply(200, json!({ "user": { "_id": "c1" } }))
            .reply(500, json!({ "message": "billing down" }));

        let err = block_on(load_summary(&h.client)).unwrap_err();

        assert_eq!(err.to_string(), "billing down (HTTP 500)");
        assert_eq!(h.transport.calls().len(), 2);
    }
}
