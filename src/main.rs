//! Main module for the Mapty application using Yew.
//! Routes UI and browser events into the controller and renders its state.

use log::debug;
use mapty::config::LOG_LEVEL;
use mapty::{Controller, Coords, Field, LocationError, PersistenceGateway, WorkoutType};
use web_sys::{Element, HtmlInputElement, MouseEvent};
use yew::prelude::*;

mod browser;
mod components;
mod logging;
mod map;

use browser::LocalStorage;
use components::{render_workout, WorkoutFormView};
use map::{LeafletView, ViewCallbacks};

enum Msg {
    Located(Coords),
    LocationFailed(LocationError),
    MapClicked(Coords),
    KindChanged(WorkoutType),
    FieldChanged(Field, String),
    Submit,
    EntryClicked(Option<String>),
    FormRestored,
    Reset,
}

struct Model {
    controller: Controller<LocalStorage, LeafletView>,
    distance_ref: NodeRef,
}

/// Resolve a click inside the list to the `data-id` of the entry it hit.
fn clicked_entry_id(e: &MouseEvent) -> Option<String> {
    let target: Element = e.target_dyn_into()?;
    let entry = target.closest(".workout").ok().flatten()?;
    entry.get_attribute("data-id")
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link();
        let view = LeafletView::new(ViewCallbacks {
            located: link.callback(Msg::Located),
            location_failed: link.callback(Msg::LocationFailed),
            map_clicked: link.callback(Msg::MapClicked),
            form_restored: link.callback(|()| Msg::FormRestored),
        });

        let mut controller = Controller::new(PersistenceGateway::new(LocalStorage::new()), view);
        controller.start();

        Self {
            controller,
            distance_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Located(coords) => self.controller.location_acquired(coords),
            Msg::LocationFailed(error) => self.controller.location_failed(error),
            Msg::MapClicked(coords) => self.controller.map_clicked(coords),
            Msg::KindChanged(kind) => self.controller.form_mut().set_kind(kind),
            Msg::FieldChanged(field, value) => self.controller.form_mut().set_field(field, value),
            Msg::Submit => {
                if let Err(e) = self.controller.submit() {
                    debug!("Submission rejected: {}", e);
                }
            }
            Msg::EntryClicked(id) => {
                self.controller.list_clicked(id.as_deref());
                return false;
            }
            Msg::FormRestored => self.controller.view_mut().restore_form(),
            Msg::Reset => self.controller.reset(),
        }
        true
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if self.controller.view_mut().take_focus_request() {
            if let Some(input) = self.distance_ref.cast::<HtmlInputElement>() {
                let _ = input.focus();
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let view = self.controller.view();
        let map_node: web_sys::Node = view.container().clone().into();

        let on_list_click = link.callback(|e: MouseEvent| Msg::EntryClicked(clicked_entry_id(&e)));

        html! {
            <>
                <div class="sidebar">
                    <ul class="workouts" onclick={on_list_click}>
                        <WorkoutFormView
                            form={self.controller.form().clone()}
                            hidden={view.form_hidden()}
                            suppressed={view.form_suppressed()}
                            distance_ref={self.distance_ref.clone()}
                            on_kind={link.callback(Msg::KindChanged)}
                            on_field={link.callback(|(field, value): (Field, String)| Msg::FieldChanged(field, value))}
                            on_submit={link.callback(|()| Msg::Submit)}
                        />
                        { for view.entries().iter().map(render_workout) }
                    </ul>
                    <button class="btn-reset" onclick={link.callback(|_| Msg::Reset)}>
                        { "Reset workouts" }
                    </button>
                </div>
                { Html::VRef(map_node) }
            </>
        }
    }
}

/// Entry point: installs logging and the panic hook, then renders the app.
fn main() {
    console_error_panic_hook::set_once();
    logging::init(LOG_LEVEL);
    yew::Renderer::<Model>::new().render();
}
