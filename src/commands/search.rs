use anyhow::{Context, Result};
use console::style;
use marketsearch::{EnrichedListing, FilterRequest};
use serde::Serialize;

use super::Engine;

#[derive(Debug, Default, Clone, Copy)]
pub struct SearchOptions {
   pub json:  bool,
   pub plain: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
   request: &'a FilterRequest,
   results: &'a [EnrichedListing],
}

pub async fn execute(engine: &Engine, request: FilterRequest, options: SearchOptions) -> Result<()> {
   let results = engine
      .search(&request)
      .await
      .context("search failed, try again")?;

   if options.json {
      println!("{}", serde_json::to_string(&JsonOutput { request: &request, results: &results })?);
      return Ok(());
   }

   if results.is_empty() {
      println!("No listings found for '{}'", request.term.trim());
      return Ok(());
   }

   format_results(&results, &request, options.plain);
   Ok(())
}

fn describe(request: &FilterRequest) -> String {
   let mut parts = Vec::new();
   if let Some(term) = request.trimmed_term() {
      parts.push(format!("'{term}'"));
   }
   if let Some(category) = request.category.value() {
      parts.push(format!("category={category}"));
   }
   if let Some(condition) = request.condition.value() {
      parts.push(format!("condition={condition}"));
   }
   match (request.min_price, request.max_price) {
      (Some(min), Some(max)) => parts.push(format!("price {min}..={max}")),
      (Some(min), None) => parts.push(format!("price >= {min}")),
      (None, Some(max)) => parts.push(format!("price <= {max}")),
      (None, None) => {},
   }
   parts.push(format!("sort={}", request.sort_by));
   parts.join(", ")
}

pub fn format_results(results: &[EnrichedListing], request: &FilterRequest, plain: bool) {
   let header = format!("Listings for {}", describe(request));
   if plain {
      println!("\n{header}\n");
   } else {
      println!("\n{}\n", style(header).bold());
   }

   for (i, result) in results.iter().enumerate() {
      let listing = &result.listing;
      let image = result.image_url.as_deref().unwrap_or("(no image)");

      if plain {
         println!("{}) {} [{}] {:.2}", i + 1, listing.title, listing.category, listing.price);
         println!("   id: {}  image: {image}", listing.id);
      } else {
         print!("{}", style(format!("{}) ", i + 1)).bold().cyan());
         print!("{} ", style(&listing.title).green());
         print!("{} ", style(format!("[{}]", listing.category)).yellow());
         println!("{}", style(format!("{:.2}", listing.price)).bold());
         println!(
            "   {} {}  {} {}",
            style("id:").dim(),
            listing.id,
            style("image:").dim(),
            style(image).dim()
         );
      }
   }

   println!();
}
