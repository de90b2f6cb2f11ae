use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

mod config;
mod hero {
    pub mod choreography;
    pub mod countdown;
    pub mod dom_engine;
    pub mod engine;
    pub mod sizing;
    pub mod ticker;
    pub mod timeline;
}
mod components {
    pub mod call_to_action;
    pub mod hero_section;
}
mod pages {
    pub mod home;
    pub mod register;
}

use pages::{home::Home, register::Register};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/register")]
    Register,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        }
        Route::Register => {
            info!("Rendering Register page");
            html! { <Register /> }
        }
        Route::NotFound => {
            info!("Unknown route, redirecting home");
            html! { <Redirect<Route> to={Route::Home} /> }
        }
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
