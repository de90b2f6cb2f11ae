use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CallToActionProps {
    pub on_register: Callback<()>,
}

/// Register button and event dates, pinned to the bottom corners of the hero.
#[function_component(CallToAction)]
pub fn call_to_action(props: &CallToActionProps) -> Html {
    let onclick = {
        let on_register = props.on_register.clone();
        Callback::from(move |_: MouseEvent| on_register.emit(()))
    };

    html! {
        <>
            <button
                onclick={onclick.clone()}
                style="position: absolute; bottom: 5%; left: 1%; padding: 10px 20px; background-color: #FFFFFF; color: #000000; border: none; font-size: 16px; cursor: pointer; z-index: 4;"
            >
                <span style="padding-right: 100px;">{"Register Now"}</span>
                <span>{">"}</span>
            </button>
            <div
                onclick={onclick}
                style="position: absolute; bottom: 5%; right: 1%; padding: 10px 20px; color: #fff; border: none; border-radius: 5px; cursor: pointer; z-index: 4;"
            >
                <h1 class="text-3xl">{"Feb 20"}<br />{"& 21"}</h1>
                <p>
                    {"A high-stakes arena where"}<br />
                    {"top minds tackle real-world"}<br />
                    {"problems."}
                </p>
            </div>
        </>
    }
}
