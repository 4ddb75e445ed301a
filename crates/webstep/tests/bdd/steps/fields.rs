//! Input field steps

use cucumber::{then, when};
use webstep::StepResult;

use crate::world::WebWorld;

#[when(expr = "I set the {string} to {string}")]
async fn set_field(
    world: &mut WebWorld,
    element_name: String,
    text: String,
) -> StepResult<()> {
    world.session.set_field(&element_name, &text).await
}

#[when(expr = "I change {string} to {string}")]
async fn change_field(
    world: &mut WebWorld,
    element_name: String,
    text: String,
) -> StepResult<()> {
    world.session.change_field(&element_name, &text).await
}

#[when(expr = "I select {string} in the {string} dropdown")]
async fn select_dropdown(
    world: &mut WebWorld,
    text: String,
    element_name: String,
) -> StepResult<()> {
    world.session.select_dropdown(&text, &element_name).await
}

#[then(expr = "I should see {string} in the {string} dropdown")]
async fn check_dropdown(
    world: &mut WebWorld,
    text: String,
    element_name: String,
) -> StepResult<()> {
    world.session.check_dropdown(&text, &element_name).await
}

#[then(expr = "the {string} field should be empty")]
async fn check_field_empty(world: &mut WebWorld, element_name: String) -> StepResult<()> {
    world.session.check_field_empty(&element_name).await
}
