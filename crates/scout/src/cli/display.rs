//! Human-readable output for CLI commands.

use colored::*;

use crate::cache::CacheHit;
use crate::research::ResearchReport;
use crate::types::TrendingTopic;

pub fn print_report(report: &ResearchReport) {
  match report {
    ResearchReport::FreshApi { topic, payload } => {
      println!("{} {} {}", "●".green(), "fresh analysis for".bold(), topic.cyan());
      println!();

      print_section("Top competitors");
      for competitor in &payload.top_competitors {
        println!(
          "  {}. {} {}",
          competitor.position,
          competitor.title.bold(),
          competitor.link.dimmed()
        );
      }

      print_strings("People also ask", &payload.people_also_ask);
      print_strings("Related searches", &payload.related_searches);
      print_trending(&payload.trending_topics);
    }
    ResearchReport::CacheAdapted(adapted) => {
      println!(
        "{} {} {} {}",
        "●".blue(),
        "adapted from".bold(),
        adapted.adaptation.based_on.cyan(),
        format!("({:.0}% similar, cached {})",
          adapted.adaptation.similarity * 100.0, adapted.adaptation.cached_at)
          .dimmed()
      );
      println!();

      print_section("Top competitors");
      for entry in &adapted.top_competitors {
        println!(
          "  {}. {} {}",
          entry.competitor.position,
          entry.competitor.title.bold(),
          entry.competitor.link.dimmed()
        );
      }

      print_strings("People also ask", &adapted.people_also_ask);
      print_strings("Related searches", &adapted.related_searches);
      print_trending(&adapted.trending_topics);
    }
  }
}

pub fn print_hit(topic: &str, hit: Option<&CacheHit>) {
  match hit {
    Some(hit) => {
      println!(
        "{} {} is {:.0}% similar to cached {}",
        "✓".green(),
        topic.cyan(),
        hit.similarity * 100.0,
        hit.analysis.topic_text.yellow()
      );
      println!("  cached at {}", hit.analysis.cached_at.dimmed());
    }
    None => {
      println!("{} no cached topic is similar enough to {}", "✗".red(), topic.cyan());
    }
  }
}

pub fn print_trending(trending: &[TrendingTopic]) {
  if trending.is_empty() {
    return;
  }

  print_section("Trending");
  for item in trending {
    println!("  {} {} {}", "▸".yellow(), item.title.bold(),
      format!("({}, {})", item.source, item.date).dimmed());
  }
}

fn print_section(title: &str) {
  println!("{}", title.blue().bold());
}

fn print_strings(title: &str, items: &[String]) {
  if items.is_empty() {
    return;
  }

  print_section(title);
  for item in items {
    println!("  - {item}");
  }
}
