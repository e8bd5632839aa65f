//! A person's page: their relationship diagram and the related-people list.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_params_map};
use log::{debug, error};

use crate::api::HttpPersonApi;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::related_list::RelatedList;
use crate::config::AppConfig;
use crate::error::LoadError;
use crate::loader::{LoadGeneration, LoadState, load_network};
use crate::network::{PersonNetwork, person_path};

fn failure_view(err: &LoadError) -> impl IntoView {
	let (title, detail) = match err {
		LoadError::NotFound { id } => (
			"Person not found",
			format!("Nobody with id \"{}\" is known.", id),
		),
		LoadError::Failed(e) => ("Could not load this person", e.to_string()),
	};
	view! {
		<div class="page-message">
			<h1>{title}</h1>
			<p>{detail}</p>
			<A href="/">"Back to all people"</A>
		</div>
	}
}

fn network_view<F>(network: PersonNetwork, go_to: F) -> impl IntoView
where
	F: Fn(String) + Clone + 'static,
{
	let PersonNetwork {
		subject,
		graph,
		related,
	} = network;
	let also_known_as = subject
		.tooltip()
		.map(|alt| view! { <p class="subtitle">"Also known as " {alt.to_string()}</p> });
	let graph = Signal::derive(move || graph.clone());

	view! {
		<header class="person-header">
			<A href="/">"All people"</A>
			<h1>{subject.name}</h1>
			{also_known_as}
		</header>
		<div class="person-network">
			<div class="network-graph">
				<ForceGraphCanvas data=graph on_select=go_to.clone() />
			</div>
			<aside class="network-sidebar">
				<h2>"Relationships"</h2>
				<RelatedList related=related on_select=go_to />
			</aside>
		</div>
	}
}

/// `/person/:id`. Reloads everything whenever the id changes.
#[component]
pub fn PersonPage() -> impl IntoView {
	let params = use_params_map();
	// The router has already unescaped the segment `person_path` encoded.
	let person_id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));
	let config = use_context::<AppConfig>().unwrap_or_default();
	let api = HttpPersonApi::from_config(&config);
	let state = RwSignal::new(LoadState::Loading);
	let generation = LoadGeneration::new();

	Effect::new(move |_| {
		let id = person_id.get();
		let ticket = generation.begin();
		debug!("person: loading {} (generation {})", id, ticket.generation());
		state.set(LoadState::Loading);

		let (api, generation) = (api.clone(), generation.clone());
		spawn_local(async move {
			let result = load_network(&api, &id).await;
			if let Err(LoadError::Failed(ref e)) = result {
				error!("person: loading {} failed: {}", id, e);
			}
			generation.apply_if_current(ticket, LoadState::from_result(result), |next| {
				state.set(next)
			});
		});
	});

	let navigate = use_navigate();
	let go_to = move |id: String| navigate(&person_path(&id), Default::default());

	view! {
		<div class="person-page">
			{move || {
				state
					.with(|s| match s {
						LoadState::Loading => {
							view! { <p class="page-message">"Loading…"</p> }.into_any()
						}
						LoadState::Failed(e) => failure_view(e).into_any(),
						LoadState::Ready(network) => {
							network_view(network.clone(), go_to.clone()).into_any()
						}
					})
			}}
		</div>
	}
}
