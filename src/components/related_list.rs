//! Sidebar listing everyone directly related to the subject.

use leptos::prelude::*;

use crate::network::RelatedPerson;

/// One row per relationship: the description and the counterpart's name.
///
/// Selecting a row always calls `on_select` with the counterpart's id.
#[component]
pub fn RelatedList<F>(related: Vec<RelatedPerson>, on_select: F) -> impl IntoView
where
	F: Fn(String) + Clone + 'static,
{
	if related.is_empty() {
		return view! { <p class="related-empty">"No known relationships."</p> }.into_any();
	}

	let rows = related
		.into_iter()
		.map(|entry| {
			let target = entry.selection_target().to_string();
			let on_select = on_select.clone();
			let tooltip = entry.person.tooltip().map(str::to_string);
			view! {
				<li class="related-entry">
					<button
						class="related-link"
						title=tooltip
						on:click=move |_| on_select(target.clone())
					>
						<span class="related-name">{entry.person.name}</span>
						<span class="related-description">{entry.relationship.description}</span>
					</button>
				</li>
			}
		})
		.collect_view();

	view! { <ul class="related-list">{rows}</ul> }.into_any()
}
