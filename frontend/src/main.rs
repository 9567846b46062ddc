use yew::prelude::*;
use yew_router::prelude::*;

mod api;
mod auth;
mod config;
mod dashboard;
mod guard;
mod layout;
mod logout;
mod models;
mod notice;
mod resource;
mod resource_page;
mod resources;
mod session;
mod transport;
mod utils;

use layout::MainLayout;
use resource_page::ResourcePage;
use resources::{Bill, Car, Reservation, User};
use session::{Role, SessionProvider};

/* -------------------- routing -------------------- */

#[derive(Routable, Clone, Debug, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/dashboard")]
    Dashboard,
    #[at("/user/profile")]
    UserProfile,
    #[at("/user/cars")]
    UserCars,
    #[at("/user/reservations")]
    UserReservations,
    #[at("/user/bills")]
    UserBills,
    #[at("/admin/login")]
    AdminLogin,
    #[at("/admin/dashboard")]
    AdminDashboard,
    #[at("/admin/dashboard/users")]
    AdminUsers,
    #[at("/admin/dashboard/reservations")]
    AdminReservations,
    #[at("/admin/dashboard/bills")]
    AdminBills,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home | Route::Login => html!(<auth::LoginForm role={Role::User} />),
        Route::Register => html!(<auth::RegisterForm />),
        Route::AdminLogin => html!(<auth::LoginForm role={Role::Admin} />),

        Route::Dashboard => html!(<MainLayout role={Role::User}><dashboard::Dashboard /></MainLayout>),
        Route::UserProfile => html!(<MainLayout role={Role::User}><dashboard::ProfileCard /></MainLayout>),
        Route::UserCars => html!(<MainLayout role={Role::User}><ResourcePage<Car> audience={Role::User} /></MainLayout>),
        Route::UserReservations => {
            html!(<MainLayout role={Role::User}><ResourcePage<Reservation> audience={Role::User} /></MainLayout>)
        }
        Route::UserBills => html!(<MainLayout role={Role::User}><ResourcePage<Bill> audience={Role::User} /></MainLayout>),

        Route::AdminDashboard => html!(<MainLayout role={Role::Admin}><dashboard::AdminHome /></MainLayout>),
        Route::AdminUsers => html!(<MainLayout role={Role::Admin}><ResourcePage<User> audience={Role::Admin} /></MainLayout>),
        Route::AdminReservations => {
            html!(<MainLayout role={Role::Admin}><ResourcePage<Reservation> audience={Role::Admin} /></MainLayout>)
        }
        Route::AdminBills => html!(<MainLayout role={Role::Admin}><ResourcePage<Bill> audience={Role::Admin} /></MainLayout>),

        Route::NotFound => html!(<h1>{"404 – Not Found"}</h1>),
    }
}

/* -------------------- entry point ---------------- */

#[function_component(App)]
fn app() -> Html {
    html! {
        <SessionProvider>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </SessionProvider>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(config::log_level()));
    log::info!("drive sync console starting");
    yew::Renderer::<App>::new().render();
}
