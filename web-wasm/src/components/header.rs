//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Style Advisor"</h1>
            <p class="subtitle">"Take a selfie, pick the occasion and get outfit, color and hair ideas"</p>
        </header>
    }
}
