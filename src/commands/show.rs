use anyhow::{Context, Result};
use console::style;

use super::Engine;

pub async fn execute(engine: &Engine, id: &str, json: bool) -> Result<()> {
   let result = engine
      .listing(id)
      .await
      .with_context(|| format!("failed to fetch listing {id}"))?;

   if json {
      println!("{}", serde_json::to_string(&result)?);
      return Ok(());
   }

   let listing = &result.listing;
   println!("{}", style(&listing.title).bold().green());
   println!("{} {:.2}", style("price:").dim(), listing.price);
   println!("{} {}", style("category:").dim(), listing.category);
   if let Some(condition) = &listing.condition {
      println!("{} {condition}", style("condition:").dim());
   }
   println!("{} {}", style("listed:").dim(), listing.created_at.format("%Y-%m-%d %H:%M"));
   println!(
      "{} {}",
      style("image:").dim(),
      result.image_url.as_deref().unwrap_or("(no image)")
   );
   if let Some(description) = &listing.description {
      println!("\n{description}");
   }

   Ok(())
}
