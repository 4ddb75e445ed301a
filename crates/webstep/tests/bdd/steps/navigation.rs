//! Navigation steps

use cucumber::{then, when};
use webstep::StepResult;

use crate::world::WebWorld;

#[when("I visit the \"Home Page\"")]
async fn visit_home_page(world: &mut WebWorld) -> StepResult<()> {
    world.session.visit_home_page().await
}

#[then(expr = "I should see {string} in the title")]
async fn check_title(world: &mut WebWorld, message: String) -> StepResult<()> {
    world.session.check_title(&message).await
}

#[then(expr = "I should not see {string}")]
async fn check_not_in_body(world: &mut WebWorld, text: String) -> StepResult<()> {
    world.session.check_not_in_body(&text).await
}
