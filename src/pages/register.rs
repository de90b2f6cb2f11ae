use yew::prelude::*;
use yew_router::prelude::*;

use crate::config;
use crate::Route;

#[function_component(Register)]
pub fn register() -> Html {
    html! {
        <div style="min-height: 100vh; background: #000; color: #fff; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 1.5rem; font-family: monospace;">
            <h1>{format!("{} registration", config::EVENT_NAME)}</h1>
            <p>{"Registration opens soon. Check back before the countdown runs out."}</p>
            <Link<Route> to={Route::Home}>
                <span style="color: #fff;">{"< Back"}</span>
            </Link<Route>>
        </div>
    }
}
