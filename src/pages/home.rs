use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use log::{error, info};

use crate::api::{HttpPersonApi, PersonApi};
use crate::config::AppConfig;
use crate::model::Person;
use crate::network::person_path;

#[derive(Clone, Debug)]
enum RosterState {
	Loading,
	Ready(Vec<Person>),
	Failed(String),
}

fn roster_view(mut people: Vec<Person>) -> impl IntoView {
	if people.is_empty() {
		return view! { <p class="page-message">"No people are known yet."</p> }.into_any();
	}
	people.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
	let rows = people
		.into_iter()
		.map(|person| {
			let href = person_path(&person.id);
			let alias = person
				.tooltip()
				.map(|alt| view! { <span class="roster-alias">{alt.to_string()}</span> });
			view! {
				<li class="roster-entry">
					<A href=href>{person.name}</A>
					{alias}
				</li>
			}
		})
		.collect_view();
	view! { <ul class="roster-list">{rows}</ul> }.into_any()
}

/// Entry point: everyone in the roster, each linking to their network page.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let api = HttpPersonApi::from_config(&config);
	let state = RwSignal::new(RosterState::Loading);

	spawn_local(async move {
		let next = match api.all_persons().await {
			Ok(people) => {
				info!("home: roster has {} people", people.len());
				RosterState::Ready(people)
			}
			Err(e) => {
				error!("home: failed to load roster: {}", e);
				RosterState::Failed(e.to_string())
			}
		};
		state.set(next);
	});

	view! {
		<div class="home-page">
			<h1>"People"</h1>
			<p class="subtitle">"Pick someone to explore their relationships."</p>
			{move || match state.get() {
				RosterState::Loading => view! { <p class="page-message">"Loading…"</p> }.into_any(),
				RosterState::Failed(message) => {
					view! {
						<div class="page-message">
							<h2>"Could not load people"</h2>
							<p>{message}</p>
						</div>
					}
						.into_any()
				}
				RosterState::Ready(people) => roster_view(people).into_any(),
			}}
		</div>
	}
}
