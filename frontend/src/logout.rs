use yew::prelude::*;

use crate::guard::full_navigation;
use crate::session::{use_session, Role};

#[derive(Properties, PartialEq)]
pub struct LogoutProps {
    pub role: Role,
}

/// Drops the token of `role` and restarts the app on its login page.
#[function_component(Logout)]
pub fn logout(props: &LogoutProps) -> Html {
    let session = use_session();
    let role = props.role;

    let onclick = Callback::from(move |_: MouseEvent| {
        session.logout(role);
        full_navigation(role.login_route());
    });

    html! { <button type="button" class="btn-logout" {onclick}>{ "Logout" }</button> }
}
