use gloo_timers::callback::Timeout;
use log::{error, info};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::{decode, ApiClient, ApiError, Method, Service, Transport};
use crate::models::{LoginBody, TokenResponse};
use crate::notice::{Notice, Tone};
use crate::resource::{Draft, DraftValue, FieldKind, FieldSpec};
use crate::resource_page::field_input;
use crate::session::{use_session, Role};
use crate::Route;

const LOGIN_FIELDS: [FieldSpec; 2] = [
    FieldSpec::new("username", "Username", FieldKind::Text),
    FieldSpec::new("password", "Password", FieldKind::Password),
];

const REGISTER_FIELDS: [FieldSpec; 5] = [
    FieldSpec::new("username", "Username", FieldKind::Text),
    FieldSpec::new("password", "Password", FieldKind::Password),
    FieldSpec::new("email", "Email", FieldKind::Email),
    FieldSpec::new("fullName", "Full Name", FieldKind::Text),
    FieldSpec::new("cars", "Cars (comma separated)", FieldKind::List).optional(),
];

/* -------------------------------------------------------------------------- */
/*                               appels identité                              */
/* -------------------------------------------------------------------------- */

fn login_path(role: Role) -> &'static str {
    match role {
        Role::User => "/auth/login",
        Role::Admin => "/auth/login/admin",
    }
}

/// Exchanges credentials for a token and stores it in the slot of the
/// client's role. Sent without any bearer header.
pub async fn sign_in<T: Transport>(client: &ApiClient<T>, username: &str, password: &str) -> Result<(), ApiError> {
    let role = client.role();
    let body = LoginBody { username: username.to_string(), password: password.to_string() };
    let body = serde_json::to_value(&body).map_err(|e| ApiError::Encode(e.to_string()))?;

    let value = client
        .request(Method::POST, Service::Identity, login_path(role), Some(&body), None)
        .await?;
    let TokenResponse { token } = decode(value)?;
    if token.is_empty() {
        return Err(ApiError::Decode("login answered without a token".into()));
    }

    client.session().login(role, &token)?;
    info!("{username} signed in as {role}");
    Ok(())
}

pub async fn register<T: Transport>(client: &ApiClient<T>, draft: &Draft) -> Result<(), ApiError> {
    let body = draft.to_json(&REGISTER_FIELDS);
    client
        .request(Method::POST, Service::Identity, "/auth/register", Some(&body), None)
        .await
        .map(|_| ())
}

/// Server message when there is one, `fallback` otherwise.
fn failure_text(e: &ApiError, fallback: &str) -> String {
    match e {
        ApiError::Unauthorized { message, .. } | ApiError::Status { message, .. } if !message.is_empty() => {
            message.clone()
        }
        _ => fallback.to_string(),
    }
}

/* -------------------------------------------------------------------------- */
/*                               formulaires                                  */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub role: Role,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let role = props.role;
    let session = use_session();
    let navigator = use_navigator();
    let draft = use_state(|| Draft::defaults(&LOGIN_FIELDS));
    let busy = use_state(|| false);
    let message = use_state(|| None::<(String, Tone)>);

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |(name, value): (&'static str, DraftValue)| {
            let mut next = (*draft).clone();
            next.set(name, value);
            draft.set(next);
        })
    };

    let onsubmit = {
        let draft = draft.clone();
        let busy = busy.clone();
        let message = message.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let client = ApiClient::browser(session.clone(), role);
            let username = draft.text("username").to_string();
            let password = draft.text("password").to_string();
            let busy = busy.clone();
            let message = message.clone();
            let navigator = navigator.clone();

            busy.set(true);
            message.set(None);
            spawn_local(async move {
                let result = sign_in(&client, &username, &password).await;
                busy.set(false);
                match (result, navigator) {
                    (Ok(()), Some(nav)) if role == Role::Admin => {
                        message.set(Some(("Admin login successful!".into(), Tone::Success)));
                        Timeout::new(1_000, move || nav.push(&Route::AdminDashboard)).forget();
                    }
                    (Ok(()), Some(nav)) => nav.push(&Route::Dashboard),
                    (Ok(()), None) => error!("no router, cannot leave the login page"),
                    (Err(e), _) => {
                        error!("{role} login failed: {e}");
                        let fallback = match role {
                            Role::User => "Login failed. Please try again.",
                            Role::Admin => "Admin login failed. Please try again.",
                        };
                        message.set(Some((failure_text(&e, fallback), Tone::Error)));
                    }
                }
            });
        })
    };

    let (title, subtitle) = match role {
        Role::User => ("Login", "car management app"),
        Role::Admin => ("Admin Login", "admin portal"),
    };
    let submit_label = if *busy { "Logging in..." } else { "Login" };
    let (text, tone) = match &*message {
        Some((text, tone)) => (Some(text.clone()), *tone),
        None => (None, Tone::Error),
    };

    html! {
        <main class="auth-page">
            <div class="brand">
                <p class="brand-name">{ "drive sync" }</p>
                <p class="brand-tag">{ subtitle }</p>
            </div>
            <form class="auth-form" {onsubmit}>
                <h2>{ title }</h2>
                <Notice message={text} {tone} />
                <fieldset disabled={*busy}>
                    { for LOGIN_FIELDS.iter().map(|spec| field_input(spec, &draft, &on_input)) }
                    <button type="submit" class="btn-primary">{ submit_label }</button>
                </fieldset>
                if role == Role::User {
                    <p class="auth-switch">
                        { "No account yet? " }
                        <Link<Route> to={Route::Register}>{ "Register" }</Link<Route>>
                    </p>
                }
            </form>
        </main>
    }
}

#[function_component(RegisterForm)]
pub fn register_form() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let draft = use_state(|| Draft::defaults(&REGISTER_FIELDS));
    let busy = use_state(|| false);
    let message = use_state(|| None::<String>);

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |(name, value): (&'static str, DraftValue)| {
            let mut next = (*draft).clone();
            next.set(name, value);
            draft.set(next);
        })
    };

    let onsubmit = {
        let draft = draft.clone();
        let busy = busy.clone();
        let message = message.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let client = ApiClient::browser(session.clone(), Role::User);
            let snapshot = (*draft).clone();
            let busy = busy.clone();
            let message = message.clone();
            let navigator = navigator.clone();

            busy.set(true);
            message.set(None);
            spawn_local(async move {
                let result = register(&client, &snapshot).await;
                busy.set(false);
                match result {
                    Ok(()) => {
                        info!("account {} created", snapshot.text("username"));
                        if let Some(nav) = navigator {
                            nav.push(&Route::Login);
                        }
                    }
                    Err(e) => {
                        error!("registration failed: {e}");
                        message.set(Some(failure_text(&e, "Registration failed. Please try again.")));
                    }
                }
            });
        })
    };

    html! {
        <main class="auth-page">
            <form class="auth-form" {onsubmit}>
                <h2>{ "Register" }</h2>
                <Notice message={(*message).clone()} />
                <fieldset disabled={*busy}>
                    { for REGISTER_FIELDS.iter().map(|spec| field_input(spec, &draft, &on_input)) }
                    <button type="submit" class="btn-primary">{ "Register" }</button>
                </fieldset>
                <p class="auth-switch">
                    { "Already registered? " }
                    <Link<Route> to={Route::Login}>{ "Login" }</Link<Route>>
                </p>
            </form>
        </main>
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::{json, Value};

    use super::*;
    use crate::api::mock::harness;
    use crate::session::Session;

    #[test]
    fn admin_sign_in_fills_only_the_admin_slot() {
        let session = Session::in_memory();
        let h = harness(&session, Role::Admin);
        h.transport.reply(200, json!({ "token": "adm-jwt" }));

        block_on(sign_in(&h.client, "root", "pw")).unwrap();

        assert_eq!(session.current_token(Role::Admin).as_deref(), Some("adm-jwt"));
        assert_eq!(session.current_token(Role::User), None);
        let call = &h.transport.calls()[0];
        assert_eq!(call.url, "https://identity.test/api/auth/login/admin");
        assert_eq!(call.header("Authorization"), None);
        let sent: Value = serde_json::from_str(call.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!({ "username": "root", "password": "pw" }));
    }

    #[test]
    fn rejected_credentials_surface_the_server_message() {
        let session = Session::in_memory();
        let h = harness(&session, Role::User);
        h.transport.reply(400, json!({ "message": "Invalid credentials" }));

        let err = block_on(sign_in(&h.client, "ana", "nope")).unwrap_err();

        assert_eq!(failure_text(&err, "Login failed. Please try again."), "Invalid credentials");
        assert_eq!(session.current_token(Role::User), None);
        assert!(h.redirects.borrow().is_empty());
    }

    #[test]
    fn network_failure_uses_the_fallback_text() {
        let err = ApiError::Network("offline".into());
        assert_eq!(failure_text(&err, "Login failed. Please try again."), "Login failed. Please try again.");
    }

    #[test]
    fn registration_sends_cars_as_a_list() {
        let session = Session::in_memory();
        let h = harness(&session, Role::User);
        h.transport.reply(201, json!({ "message": "User registered" }));

        let draft = Draft::defaults(&REGISTER_FIELDS)
            .with_text("username", "ana")
            .with_text("password", "pw")
            .with_text("email", "ana@example.com")
            .with_text("fullName", "Ana Pop")
            .with_text("cars", "Golf, Clio");

        block_on(register(&h.client, &draft)).unwrap();

        let call = &h.transport.calls()[0];
        assert_eq!(call.url, "https://identity.test/api/auth/register");
        let sent: Value = serde_json::from_str(call.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["cars"], json!(["Golf", "Clio"]));
        assert_eq!(sent["fullName"], "Ana Pop");
    }
}
