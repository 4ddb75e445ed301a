//! Clipboard steps
//!
//! The clipboard is a single value on the session, not the OS clipboard.

use cucumber::when;
use webstep::StepResult;

use crate::world::WebWorld;

#[when(expr = "I copy the {string} field")]
async fn copy_field(world: &mut WebWorld, element_name: String) -> StepResult<()> {
    world.session.copy_field(&element_name).await
}

#[when(expr = "I paste the {string} field")]
async fn paste_field(world: &mut WebWorld, element_name: String) -> StepResult<()> {
    world.session.paste_field(&element_name).await
}
