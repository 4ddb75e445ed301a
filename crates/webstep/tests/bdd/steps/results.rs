//! Result and search steps

use cucumber::then;
use webstep::StepResult;

use crate::world::WebWorld;

#[then(expr = "I should see {string} in the {string} field")]
async fn check_field_value(
    world: &mut WebWorld,
    text: String,
    element_name: String,
) -> StepResult<()> {
    world.session.check_field_value(&text, &element_name).await
}

#[then(expr = "I should see {string} in the results")]
async fn check_results(world: &mut WebWorld, name: String) -> StepResult<()> {
    world.session.check_results(&name).await
}

#[then(expr = "I should not see {string} in the results")]
async fn check_results_not(world: &mut WebWorld, name: String) -> StepResult<()> {
    world.session.check_results_not(&name).await
}

#[then(expr = "I should see the message {string}")]
async fn check_flash_message(world: &mut WebWorld, message: String) -> StepResult<()> {
    world.session.check_flash_message(&message).await
}
