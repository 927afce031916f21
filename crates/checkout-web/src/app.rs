//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::CheckoutPage;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <Routes fallback=|| view! { <p>"Page not found"</p> }>
                <Route path=path!("/") view=CheckoutPage />
                <Route path=path!("/checkout") view=CheckoutPage />
            </Routes>
        </Router>
    }
}
