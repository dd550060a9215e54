//! 場面・服装の選択パネル

use leptos::prelude::*;

use style_advisor_common::{Attire, Occasion};

#[component]
pub fn SelectionPanel(
    occasion: ReadSignal<Option<Occasion>>,
    set_occasion: WriteSignal<Option<Occasion>>,
    attire: ReadSignal<Option<Attire>>,
    set_attire: WriteSignal<Option<Attire>>,
    attire_required: bool,
) -> impl IntoView {
    let occasion_options = Occasion::ALL
        .iter()
        .map(|&o| {
            view! {
                <option value=o.as_str() selected=move || occasion.get() == Some(o)>
                    {o.label()}
                </option>
            }
        })
        .collect_view();

    let attire_options = Attire::ALL
        .iter()
        .map(|&a| {
            view! {
                <option value=a.as_str() selected=move || attire.get() == Some(a)>
                    {a.label()}
                </option>
            }
        })
        .collect_view();

    view! {
        <div class="settings-panel">
            <div class="settings-grid">
                <div class="form-group">
                    <label for="occasion">"Occasion"</label>
                    <select
                        id="occasion"
                        on:change=move |ev| {
                            set_occasion.set(event_target_value(&ev).parse().ok());
                        }
                    >
                        <option value="" selected=move || occasion.get().is_none()>
                            "Select an occasion"
                        </option>
                        {occasion_options}
                    </select>
                </div>

                <div class="form-group">
                    <label for="attire">
                        {if attire_required { "Attire" } else { "Attire (optional)" }}
                    </label>
                    <select
                        id="attire"
                        on:change=move |ev| {
                            set_attire.set(event_target_value(&ev).parse().ok());
                        }
                    >
                        <option value="" selected=move || attire.get().is_none()>
                            "Select an attire"
                        </option>
                        {attire_options}
                    </select>
                </div>
            </div>
        </div>
    }
}
