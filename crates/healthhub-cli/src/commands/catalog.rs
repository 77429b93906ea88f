use clap::Subcommand;
use healthhub_core::Catalog;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List health topics
    Topics {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one topic
    Topic {
        /// Topic id
        id: String,
    },
    /// List government schemes
    Schemes {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one scheme
    Scheme {
        /// Scheme id
        id: u64,
    },
    /// List hospitals
    Hospitals {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one hospital
    Hospital {
        /// Hospital id
        id: u64,
    },
    /// Show a wellness article
    Article {
        /// Article slug
        slug: String,
    },
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::open()?;
    match action {
        CatalogAction::Topics { json } => {
            let topics = catalog.topics()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&topics)?);
            } else {
                for t in &topics {
                    println!("{}  {} ({})", t.id, t.title, t.category);
                }
            }
        }
        CatalogAction::Topic { id } => match catalog.topic(&id)? {
            Some(topic) => println!("{}", serde_json::to_string_pretty(&topic)?),
            None => not_found(&format!("topic '{id}'")),
        },
        CatalogAction::Schemes { json } => {
            let schemes = catalog.schemes()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&schemes)?);
            } else {
                for s in &schemes {
                    println!("{}  {}", s.id, field(&s.fields, "name"));
                }
            }
        }
        CatalogAction::Scheme { id } => match catalog.scheme(id)? {
            Some(scheme) => println!("{}", serde_json::to_string_pretty(&scheme)?),
            None => not_found(&format!("scheme {id}")),
        },
        CatalogAction::Hospitals { json } => {
            let hospitals = catalog.hospitals()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&hospitals)?);
            } else {
                for h in &hospitals {
                    println!("{}  {}", h.id, field(&h.fields, "name"));
                }
            }
        }
        CatalogAction::Hospital { id } => match catalog.hospital(id)? {
            Some(hospital) => println!("{}", serde_json::to_string_pretty(&hospital)?),
            None => not_found(&format!("hospital {id}")),
        },
        CatalogAction::Article { slug } => match catalog.article(&slug)? {
            Some(article) => {
                println!("{}", article.title);
                println!();
                println!("{}", article.content);
            }
            None => not_found(&format!("article '{slug}'")),
        },
    }
    Ok(())
}

fn field(fields: &serde_json::Map<String, serde_json::Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("(unnamed)")
        .to_string()
}

fn not_found(what: &str) -> ! {
    eprintln!("not found: {what}");
    std::process::exit(1);
}
