//! Background data steps

use cucumber::{gherkin::Step, given};
use webstep::seed::Seeder;
use webstep::{StepError, StepResult};

use crate::world::WebWorld;

/// Table format:
/// ```text
/// | name | description | price | available | category |
/// | Hat  | A red fedora | 59.95 | True      | Cloths   |
/// ```
///
/// `True`/`False` cells are sent as booleans and numbers that print back
/// exactly as written (`59.95`, `120`) as JSON numbers. An empty cell is
/// sent as `null`; the text `null` stays a string, as do `007` and `87.00`.
#[given("the following products:")]
async fn load_products(world: &mut WebWorld, step: &Step) -> StepResult<()> {
    let table = step
        .table
        .as_ref()
        .ok_or_else(|| StepError::Seed("expected a data table".to_string()))?;

    Seeder::new(world.session.config())?
        .reset_and_load(&table.rows)
        .await?;
    Ok(())
}
