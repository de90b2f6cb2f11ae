use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::hero_section::HeroSection;
use crate::Route;

#[function_component(Home)]
pub fn home() -> Html {
    let navigator = use_navigator();

    let on_register = Callback::from(move |_: ()| {
        info!("Register call to action clicked");
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message("Navigate to registration page");
        }
        if let Some(navigator) = &navigator {
            navigator.push(&Route::Register);
        }
    });

    html! {
        <div class="landing-page" style="background: #000; min-height: 100vh;">
            <HeroSection {on_register} />
        </div>
    }
}
