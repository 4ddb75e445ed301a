use cucumber::when;
use webstep::StepResult;

use crate::world::WebWorld;

#[when(expr = "I press the {string} button")]
async fn press_button(world: &mut WebWorld, button: String) -> StepResult<()> {
    world.session.press_button(&button).await
}
