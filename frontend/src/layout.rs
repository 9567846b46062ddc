use yew::prelude::*;
use yew_router::prelude::*;

use crate::guard::Guard;
use crate::logout::Logout;
use crate::session::Role;
use crate::Route;

/// Navigation entries of each shell, in display order.
pub fn nav_links(role: Role) -> &'static [(Route, &'static str)] {
    match role {
        Role::User => &[
            (Route::Dashboard, "Dashboard"),
            (Route::UserProfile, "Profile"),
            (Route::UserCars, "Cars"),
            (Route::UserReservations, "Reservations"),
            (Route::UserBills, "Bills"),
        ],
        Role::Admin => &[
            (Route::AdminUsers, "Users"),
            (Route::AdminBills, "Bills"),
            (Route::AdminReservations, "Reservations"),
        ],
    }
}

#[derive(Properties, PartialEq)]
pub struct MainLayoutProps {
    pub role: Role,
    #[prop_or_default]
    pub children: Children,
}

/// Header, navigation and logout around a guarded page.
#[function_component(MainLayout)]
pub fn main_layout(props: &MainLayoutProps) -> Html {
    let role = props.role;
    let current = use_route::<Route>();
    let tagline = match role {
        Role::User => "car management app",
        Role::Admin => "admin portal",
    };
    let home = match role {
        Role::User => Route::Dashboard,
        Role::Admin => Route::AdminDashboard,
    };

    html! {
        <Guard {role}>
            <header class="header">
                <Link<Route> to={home} classes={classes!("brand")}>
                    <p class="brand-name">{ "drive sync" }</p>
                    <p class="brand-tag">{ tagline }</p>
                </Link<Route>>
                <nav class="nav">
                    <ul class="nav-list">
                        { for nav_links(role).iter().map(|(route, label)| {
                            let class = if current.as_ref() == Some(route) { "nav-item active" } else { "nav-item" };
                            html! {
                                <li {class}><Link<Route> to={route.clone()}>{ *label }</Link<Route>></li>
                            }
                        }) }
                    </ul>
                    <Logout {role} />
                </nav>
            </header>

            <main class="main-content">
                { for props.children.iter() }
            </main>
        </Guard>
    }
}
