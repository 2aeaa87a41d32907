use clap::{Parser, Subcommand, ValueEnum};
use formlogic::prelude::*;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReasonsCli {
    WhenHidden,
    Always,
}

/// Evaluate, validate and inspect conditional logic of form definitions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate every field's visibility against a set of answers
    Evaluate {
        /// Path to the form definition JSON file
        form_path: String,
        /// Optional path to a `{ "fieldId": value }` JSON file; no answers if omitted
        values_path: Option<String>,
        /// When to report reasons for failed conditions
        #[arg(short, long, value_enum, default_value = "when-hidden")]
        reasons: ReasonsCli,
    },
    /// Check every field's conditional logic for broken references and cycles
    Validate {
        /// Path to the form definition JSON file
        form_path: String,
    },
    /// Print the order in which fields should be evaluated
    Order {
        /// Path to the form definition JSON file
        form_path: String,
    },
    /// Print the dependency graph as JSON
    Graph {
        /// Path to the form definition JSON file
        form_path: String,
    },
}

/// Sorted view of a graph node, so output is stable between runs.
#[derive(Serialize)]
struct NodeView {
    dependencies: Vec<String>,
    dependents: Vec<String>,
    level: Option<u32>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Evaluate {
            form_path,
            values_path,
            reasons,
        } => run_evaluate(&form_path, values_path.as_deref(), reasons),
        Command::Validate { form_path } => run_validate(&form_path),
        Command::Order { form_path } => run_order(&form_path),
        Command::Graph { form_path } => run_graph(&form_path),
    }
}

fn load_form(form_path: &str) -> FormConfig {
    FormConfig::from_file(form_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load form '{}': {}", form_path, e))
    })
}

fn run_evaluate(form_path: &str, values_path: Option<&str>, reasons: ReasonsCli) {
    let form = load_form(form_path);
    let values = match values_path {
        Some(path) => field_values_from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load values from '{}': {}", path, e))
        }),
        None => {
            println!("No values file provided. Evaluating with no answers.");
            FieldValues::new()
        }
    };

    let policy = match reasons {
        ReasonsCli::WhenHidden => ReasonPolicy::WhenHidden,
        ReasonsCli::Always => ReasonPolicy::Always,
    };
    let evaluator = ConditionalEvaluator::builder()
        .with_reason_policy(policy)
        .build();

    let eval_start = Instant::now();
    let order = evaluator.get_field_evaluation_order(&form.fields);
    let results = evaluator.evaluate_all_fields(&form.fields, &values);
    let eval_duration = eval_start.elapsed();

    println!("\nForm: {} ({} fields)", form.title, form.fields.len());
    for field_id in &order {
        let Some(result) = results.get(field_id) else {
            continue;
        };
        let label = form.field(field_id).map_or(field_id.as_str(), |f| f.label.as_str());
        let state = if result.visible { "visible" } else { "hidden" };
        println!("  [{}] {} ({})", state, label, field_id);
        for reason in &result.reasons {
            println!("      - {}", reason);
        }
    }

    let hidden = results.values().filter(|r| !r.visible).count();
    println!("\n--- Summary ---");
    println!("Visible fields:  {}", results.len() - hidden);
    println!("Hidden fields:   {}", hidden);
    println!("Evaluation:      {:?}", eval_duration);
}

fn run_validate(form_path: &str) {
    let form = load_form(form_path);
    let manager = DependencyManager::new(form.fields);
    let validation = manager.validate();

    if validation.is_valid {
        println!("Conditional logic is valid ({} fields).", manager.field_count());
        return;
    }

    println!("Conditional logic has {} error(s):", validation.errors.len());
    for error in &validation.errors {
        println!("  - {}", error);
    }
    std::process::exit(1);
}

fn run_order(form_path: &str) {
    let form = load_form(form_path);
    let manager = DependencyManager::new(form.fields);

    for (position, field_id) in manager.get_evaluation_order().iter().enumerate() {
        let level = manager
            .get_graph()
            .node(field_id)
            .and_then(|n| n.level)
            .map_or("-".to_string(), |l| l.to_string());
        println!("{:>3}. {} (level {})", position + 1, field_id, level);
    }

    let circular = manager.get_circular_fields();
    if !circular.is_empty() {
        println!(
            "\nWarning: fields on a circular dependency: {}",
            circular.iter().map(|f| f.id.as_str()).join(", ")
        );
    }
}

fn run_graph(form_path: &str) {
    let form = load_form(form_path);
    let manager = DependencyManager::new(form.fields);

    let view: BTreeMap<&str, NodeView> = manager
        .get_graph()
        .nodes
        .iter()
        .map(|(id, node)| {
            let view = NodeView {
                dependencies: node.dependencies.iter().cloned().sorted().collect(),
                dependents: node.dependents.iter().cloned().sorted().collect(),
                level: node.level,
            };
            (id.as_str(), view)
        })
        .collect();

    let json = serde_json::to_string_pretty(&view)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize graph: {}", e)));
    println!("{}", json);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
