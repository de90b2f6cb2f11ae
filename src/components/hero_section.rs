use chrono::{DateTime, Utc};
use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

use crate::components::call_to_action::CallToAction;
use crate::config;
use crate::hero::choreography::{CountdownFeed, HeroChoreography};
use crate::hero::countdown::{self, time_left, wall_clock, CountdownState};
use crate::hero::dom_engine::DomScrollEngine;
use crate::hero::sizing;
use crate::hero::ticker::IntervalTicks;
use crate::hero::timeline::Layer;

fn countdown_target() -> DateTime<Utc> {
    countdown::event_start().unwrap_or_else(|| {
        warn!("event start does not exist in the configured time zone");
        Utc::now()
    })
}

#[derive(Properties, PartialEq)]
pub struct HeroSectionProps {
    pub on_register: Callback<()>,
}

#[function_component(HeroSection)]
pub fn hero_section(props: &HeroSectionProps) -> Html {
    let section_ref = use_node_ref();
    let title_ref = use_node_ref();
    let image_ref = use_node_ref();
    let timer_ref = use_node_ref();
    let timer = use_state(|| time_left(&Utc::now(), &countdown_target()));
    let revealed = use_state(|| false);

    {
        let section_ref = section_ref.clone();
        let title_ref = title_ref.clone();
        let image_ref = image_ref.clone();
        let timer_ref = timer_ref.clone();
        let set_timer = timer.setter();
        let set_revealed = revealed.setter();
        use_effect_with_deps(move |_| {
            sizing::apply_sizes(&title_ref, &timer_ref);

            let window = web_sys::window();
            let resize_callback = {
                let title_ref = title_ref.clone();
                let timer_ref = timer_ref.clone();
                Closure::wrap(Box::new(move || {
                    sizing::apply_sizes(&title_ref, &timer_ref);
                }) as Box<dyn FnMut()>)
            };
            if let Some(window) = &window {
                if window
                    .add_event_listener_with_callback("resize", resize_callback.as_ref().unchecked_ref())
                    .is_err()
                {
                    gloo_console::error!("Failed to add resize listener");
                }
            }

            let mut engine = DomScrollEngine::new(
                section_ref,
                vec![(Layer::Image, image_ref), (Layer::Timer, timer_ref)],
            );
            let feed = CountdownFeed {
                target: countdown_target(),
                clock: wall_clock(),
                on_update: Callback::from(move |state: CountdownState| set_timer.set(state)),
            };
            let choreography = HeroChoreography::mount(
                &mut engine,
                IntervalTicks,
                feed,
                Callback::from(move |_| set_revealed.set(true)),
            );

            move || {
                if let Some(window) = window {
                    let _ = window.remove_event_listener_with_callback(
                        "resize",
                        resize_callback.as_ref().unchecked_ref(),
                    );
                }
                choreography.teardown(&mut engine);
            }
        }, ());
    }

    html! {
        <div class="hero-pin-spacer">
            <div
                ref={section_ref}
                class="hero-section"
                style="height: 100vh; position: relative; overflow: hidden;"
            >
                <div
                    ref={title_ref}
                    style="position: absolute; top: 17%; left: 50%; transform: translate(-50%, -50%); width: 100%; text-align: center; color: rgba(255, 255, 255, 1); font-weight: bold; letter-spacing: 0.5rem; z-index: 1; user-select: none; white-space: nowrap;"
                >
                    {config::EVENT_NAME}
                </div>

                <img
                    ref={image_ref}
                    src={config::HERO_IMAGE}
                    alt="Hero"
                    style="position: absolute; width: 80%; height: 80%; object-fit: cover; z-index: 2; margin: auto; left: 50%; top: 50%; transform: translate(-50%, -50%);"
                />

                <div
                    ref={timer_ref}
                    style="position: absolute; top: 40%; left: 50%; transform: translate(-50%, -50%); color: white; text-align: center; z-index: 3; width: 100%; font-family: monospace; letter-spacing: 0.2rem;"
                >
                    <p>{(*timer).to_string()}</p>
                </div>

                {
                    if *revealed {
                        html! { <CallToAction on_register={props.on_register.clone()} /> }
                    } else {
                        html! {}
                    }
                }
            </div>
        </div>
    }
}
