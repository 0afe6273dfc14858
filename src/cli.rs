//! `a11y-audit report`: drives the client engine from a terminal.

use anyhow::{bail, Context};

use crate::client::api::AuditClient;
use crate::client::context::AuditContext;
use crate::client::knowledge::{JsonKnowledgeBase, KnowledgeBase};
use crate::client::navigator::DetailNavigator;
use crate::client::store::ReportStore;
use crate::client::view::{current_detail, DetailPageView, ResultCardView, SummaryView};
use crate::config::{default_settings_path, ReportArgs};
use crate::settings::FileAuditUrlStore;

pub async fn run_report(args: ReportArgs) -> anyhow::Result<()> {
    let settings_path = args.settings.clone().unwrap_or_else(default_settings_path);
    let mut context = AuditContext::load(Box::new(FileAuditUrlStore::new(settings_path)));

    if let Some(url) = &args.url {
        context.set_url(url);
    }
    let target = match context.current_url() {
        Some(url) => url.to_string(),
        None => bail!("No URL given and no previously audited URL to resume"),
    };

    let client = AuditClient::new(&args.server).context("Invalid --server")?;
    if !client.is_ready().await {
        bail!("Audit service at {} is not responding", args.server);
    }

    let mut store = ReportStore::new();
    store.begin_loading(&target);
    println!("Auditing {} ...", target);
    let result = client.audit(&target).await;
    store.finish(result);

    if let Some(message) = store.error_message() {
        println!("{}", message);
        if let Some(retry) = store.retry_target() {
            println!("Retry with: a11y-audit report {}", retry);
        }
        bail!("Audit failed");
    }

    if let Some(summary) = store.summary() {
        print_summary(&summary);
    }

    store.select_category(args.category);
    if let Some(tag) = &args.tag {
        store.select_tag(tag);
    }

    println!();
    println!(
        "{} [tag: {}]  available tags: {}",
        args.category.label(),
        store.filter().active_tag,
        store.available_tags().join(", ")
    );
    for item in store.visible_items() {
        print_card(&ResultCardView::from(item));
    }

    if let Some(rule_id) = &args.detail {
        let kb = match &args.knowledge_base {
            Some(path) => JsonKnowledgeBase::load_or_empty(path),
            None => JsonKnowledgeBase::default(),
        };
        print_details(&store, rule_id, &kb)?;
    }

    Ok(())
}

fn print_summary(summary: &SummaryView) {
    println!("Accessibility score: {}%", summary.score);
    for c in &summary.counts {
        println!("  {:<13} {}", c.label, c.count);
    }
}

fn print_card(card: &ResultCardView) {
    println!(
        "  - {} [{}] {} ({} node{})",
        card.id,
        card.impact,
        card.description,
        card.node_count,
        if card.node_count == 1 { "" } else { "s" }
    );
}

fn print_details(
    store: &ReportStore,
    rule_id: &str,
    kb: &dyn KnowledgeBase,
) -> anyhow::Result<()> {
    let item = store
        .report()
        .and_then(|report| {
            crate::model::Category::ALL
                .iter()
                .flat_map(|c| report.items(*c))
                .find(|item| item.id == rule_id)
        })
        .cloned()
        .with_context(|| format!("Rule {} is not in this report", rule_id))?;

    let mut nav = DetailNavigator::new();
    nav.open(item);
    loop {
        if let Some(page) = current_detail(&nav, kb) {
            println!();
            println!("--- Page {} of 3 ---", nav.page().number());
            print_detail_page(&page);
        }
        if nav.next().is_none() {
            break;
        }
    }
    nav.close();
    Ok(())
}

fn print_detail_page(page: &DetailPageView) {
    match page {
        DetailPageView::Impact {
            id,
            impact,
            description,
            issue_explanation,
            impact_description,
        } => {
            println!("{} ({})", id, impact);
            println!("{}", description);
            println!("Issue: {}", issue_explanation);
            println!("Impact: {}", impact_description);
        }
        DetailPageView::Analysis {
            technical_analysis,
            nodes,
            ..
        } => {
            println!("Technical analysis: {}", technical_analysis);
            for node in nodes {
                println!("  {}  {}", node.target, node.html);
            }
        }
        DetailPageView::Fixes {
            fixes,
            best_practices,
            code_before,
            code_after,
            resources,
            ..
        } => {
            println!("Fixes:");
            for fix in fixes {
                println!("  * {}", fix);
            }
            println!("Best practices:");
            for bp in best_practices {
                println!("  * {}", bp);
            }
            println!("Before: {}", code_before);
            println!("After:  {}", code_after);
            for r in resources {
                println!("  {} <{}>", r.title, r.url);
            }
        }
    }
}
