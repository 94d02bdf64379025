use anyhow::Result;
use console::style;

use super::Engine;

pub async fn execute(engine: &Engine, clear: bool, json: bool) -> Result<()> {
   if clear {
      engine.clear_recent().await;
      if !json {
         println!("Recent searches cleared");
         return Ok(());
      }
   }

   let terms = engine.recent().await;

   if json {
      println!("{}", serde_json::to_string(&terms)?);
   } else if terms.is_empty() {
      println!("No recent searches");
   } else {
      println!("{}", style("Recent searches").bold());
      for term in terms {
         println!("  {term}");
      }
   }

   Ok(())
}
