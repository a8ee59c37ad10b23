//! Pure Yew view pieces for the workout sidebar.
//!
//! Everything here renders from props; state lives in the controller.

use mapty::{Activity, Field, Workout, WorkoutForm, WorkoutType};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

fn detail(icon: &str, value: String, unit: &str) -> Html {
    html! {
        <div class="workout__details">
            <span class="workout__icon">{ icon }</span>
            <span class="workout__value">{ value }</span>
            <span class="workout__unit">{ unit }</span>
        </div>
    }
}

/// Renders one list entry. The `data-id` attribute maps clicks back to the record.
pub fn render_workout(workout: &Workout) -> Html {
    let kind = workout.kind();
    let metric = match *workout.activity() {
        Activity::Running { cadence, pace } => html! {
            <>
                { detail("⚡️", format!("{:.1}", pace), "min/km") }
                { detail("🦶🏼", cadence.to_string(), "spm") }
            </>
        },
        Activity::Cycling { elevation_gain, speed } => html! {
            <>
                { detail("⚡️", format!("{:.1}", speed), "km/h") }
                { detail("⛰", elevation_gain.to_string(), "m") }
            </>
        },
    };

    html! {
        <li class={classes!("workout", format!("workout--{}", kind))} data-id={workout.id().to_string()}>
            <h2 class="workout__title">{ workout.description() }</h2>
            { detail(kind.icon(), workout.distance().to_string(), "km") }
            { detail("⏱", workout.duration().to_string(), "min") }
            { metric }
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct WorkoutFormProps {
    pub form: WorkoutForm,
    /// Form is folded away
    pub hidden: bool,
    /// Layout is suppressed while the hide transition settles
    pub suppressed: bool,
    pub distance_ref: NodeRef,
    pub on_kind: Callback<WorkoutType>,
    pub on_field: Callback<(Field, String)>,
    pub on_submit: Callback<()>,
}

/// Entry form for a new workout.
#[function_component(WorkoutFormView)]
pub fn workout_form_view(props: &WorkoutFormProps) -> Html {
    let onsubmit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(());
        })
    };

    let onchange = {
        let on_kind = props.on_kind.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(kind) = select.value().parse::<WorkoutType>() {
                on_kind.emit(kind);
            }
        })
    };

    let input_for = |field: Field| {
        let on_field = props.on_field.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_field.emit((field, input.value()));
        })
    };

    let form = &props.form;
    let running = form.kind() == WorkoutType::Running;
    let row_class = |visible: bool| classes!("form__row", (!visible).then_some("form__row--hidden"));

    html! {
        <form
            class={classes!("form", props.hidden.then_some("hidden"))}
            style={if props.suppressed { "display: none" } else { "display: grid" }}
            {onsubmit}
        >
            <div class="form__row">
                <label class="form__label">{ "Type" }</label>
                <select class="form__input form__input--type" {onchange}>
                    <option value="running" selected={running}>{ "Running" }</option>
                    <option value="cycling" selected={!running}>{ "Cycling" }</option>
                </select>
            </div>
            <div class="form__row">
                <label class="form__label">{ "Distance" }</label>
                <input
                    class="form__input form__input--distance"
                    placeholder="km"
                    ref={props.distance_ref.clone()}
                    value={form.field(Field::Distance).to_string()}
                    oninput={input_for(Field::Distance)}
                />
            </div>
            <div class="form__row">
                <label class="form__label">{ "Duration" }</label>
                <input
                    class="form__input form__input--duration"
                    placeholder="min"
                    value={form.field(Field::Duration).to_string()}
                    oninput={input_for(Field::Duration)}
                />
            </div>
            <div class={row_class(running)}>
                <label class="form__label">{ "Cadence" }</label>
                <input
                    class="form__input form__input--cadence"
                    placeholder="step/min"
                    value={form.field(Field::Cadence).to_string()}
                    oninput={input_for(Field::Cadence)}
                />
            </div>
            <div class={row_class(!running)}>
                <label class="form__label">{ "Elev Gain" }</label>
                <input
                    class="form__input form__input--elevation"
                    placeholder="meters"
                    value={form.field(Field::ElevationGain).to_string()}
                    oninput={input_for(Field::ElevationGain)}
                />
            </div>
            <button class="form__btn">{ "OK" }</button>
        </form>
    }
}
