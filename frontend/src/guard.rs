use log::{error, info};
use yew::prelude::*;

use crate::notice::Loading;
use crate::session::{use_session, Role, Session};

#[derive(Clone, Debug, PartialEq)]
pub enum GuardOutcome {
    Authorized(String),
    Redirect(&'static str),
}

/// Decides once whether a view may render for `role`.
pub fn check(session: &Session, role: Role) -> GuardOutcome {
    match session.current_token(role) {
        Some(token) => GuardOutcome::Authorized(token),
        None => GuardOutcome::Redirect(role.login_route()),
    }
}

/// Full page navigation (not a router push): the app restarts from `path`.
pub fn full_navigation(path: &str) {
    let Some(window) = web_sys::window() else {
        error!("no window, cannot navigate to {path}");
        return;
    };
    if let Err(e) = window.location().set_href(path) {
        error!("navigation to {path} failed: {e:?}");
    }
}

#[derive(Properties, PartialEq)]
pub struct GuardProps {
    pub role: Role,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(Guard)]
pub fn guard(props: &GuardProps) -> Html {
    let session = use_session();
    let outcome = {
        let role = props.role;
        use_state(move || check(&session, role))
    };

    {
        let outcome = (*outcome).clone();
        use_effect_with((), move |_| {
            if let GuardOutcome::Redirect(route) = outcome {
                info!("no session, redirecting to {route}");
                full_navigation(route);
            }
            || ()
        });
    }

    match &*outcome {
        GuardOutcome::Authorized(_) => html! { for props.children.iter() },
        GuardOutcome::Redirect(_) => html!(<Loading />),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_token_redirects_to_role_login() {
        let session = Session::in_memory();

        assert_eq!(check(&session, Role::User), GuardOutcome::Redirect("/"));
        assert_eq!(check(&session, Role::Admin), GuardOutcome::Redirect("/admin/login"));
    }

    #[test]
    fn present_token_authorizes() {
        let session = Session::in_memory();
        session.login(Role::Admin, "adm").unwrap();

        assert_eq!(check(&session, Role::Admin), GuardOutcome::Authorized("adm".into()));
        assert_eq!(check(&session, Role::User), GuardOutcome::Redirect("/"));
    }
}
