//! Command-line access to the style rules of a book page.
//!
//! Every command loads one XHTML page, runs the requested operation against
//! it and prints the result. Pages are never written back; commands that
//! change rules print the resulting `userModifiedStyles` sheet instead.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::style;
use stylebook::store::user_sheet;
use stylebook::{
    formatting_styles, get_or_create_rule_for_style, lang_value, read_format_values,
    style_name_for_element, Document, EditorConfig, ElementId, StaticHost, StyleEditor,
};

fn cli() -> Command {
    let page = || {
        Arg::new("page")
            .value_name("PAGE")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .help("XHTML page to read")
    };
    let element = || {
        Arg::new("id")
            .value_name("ID")
            .required(true)
            .help("id attribute of the text box")
    };

    Command::new("stylebook")
        .about("Inspect and edit the per-language style rules of a book page")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Editor configuration (YAML or JSON)"),
        )
        .arg(
            Arg::new("author")
                .long("author")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Edit as the book's author: changes apply to every language"),
        )
        .arg(
            Arg::new("fonts")
                .long("fonts")
                .value_name("LIST")
                .global(true)
                .help("Comma-separated fonts offered by the format dialog"),
        )
        .subcommand(
            Command::new("styles")
                .about("List the styles offered for the page")
                .arg(page()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show a box's style and the format values it displays")
                .arg(page())
                .arg(element()),
        )
        .subcommand(
            Command::new("set-size")
                .about("Set a box's font size in points")
                .arg(page())
                .arg(element())
                .arg(
                    Arg::new("size")
                        .value_name("SIZE")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .help("Size in points"),
                ),
        )
        .subcommand(
            Command::new("bigger")
                .about("Make a box's text two points bigger")
                .arg(page())
                .arg(element()),
        )
        .subcommand(
            Command::new("smaller")
                .about("Make a box's text two points smaller")
                .arg(page())
                .arg(element()),
        )
        .subcommand(
            Command::new("apply-style")
                .about("Switch a box to another style")
                .arg(page())
                .arg(element())
                .arg(
                    Arg::new("name")
                        .value_name("NAME")
                        .required(true)
                        .help("Style name without the -style suffix"),
                ),
        )
        .subcommand(
            Command::new("rule")
                .about("Show the user rule that edits to a box would change")
                .arg(page())
                .arg(element())
                .arg(
                    Arg::new("ignore-language")
                        .long("ignore-language")
                        .action(ArgAction::SetTrue)
                        .help("Use the rule shared by every language"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<EditorConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => Ok(EditorConfig::load(path)?),
        None => Ok(EditorConfig::default()),
    }
}

fn load_page(path: &Path) -> Result<Document> {
    let markup =
        fs::read_to_string(path).with_context(|| format!("reading page {}", path.display()))?;
    Document::from_xhtml(&markup).with_context(|| format!("parsing page {}", path.display()))
}

fn find_box(doc: &Document, id: &str) -> Result<ElementId> {
    match doc.find_by_id(id) {
        Some(element) => Ok(element),
        None => bail!("no element with id '{}'", id),
    }
}

/// Page and box named by a subcommand's arguments.
fn target(matches: &ArgMatches) -> Result<(Document, ElementId)> {
    let path = matches
        .get_one::<PathBuf>("page")
        .context("missing page argument")?;
    let doc = load_page(path)?;
    let id = matches
        .get_one::<String>("id")
        .context("missing id argument")?;
    let element = find_box(&doc, id)?;
    Ok((doc, element))
}

fn write_user_sheet(out: &mut impl Write, doc: &Document) -> Result<()> {
    let css = user_sheet(doc)
        .and_then(|index| doc.sheet(index))
        .map(|sheet| sheet.to_css())
        .unwrap_or_default();
    if css.is_empty() {
        writeln!(out, "{}", style("/* no user rules */").dim())?;
    } else {
        write!(out, "{}", css)?;
    }
    Ok(())
}

fn run(matches: &ArgMatches, out: &mut impl Write) -> Result<()> {
    let config = load_config(matches)?;
    let author = matches.get_flag("author");
    let fonts = matches
        .get_one::<String>("fonts")
        .map(String::as_str)
        .unwrap_or_default();
    let host = StaticHost::from_payloads(if author { "true" } else { "false" }, fonts);

    match matches.subcommand() {
        Some(("styles", sub)) => {
            let path = sub.get_one::<PathBuf>("page").context("missing page argument")?;
            let doc = load_page(path)?;
            let mut styles = formatting_styles(&doc);
            styles.sort_by_key(|name| name.to_lowercase());
            for name in styles {
                writeln!(out, "{}", name)?;
            }
        }
        Some(("inspect", sub)) => {
            let (mut doc, element) = target(sub)?;
            let Some(style_name) = style_name_for_element(&mut doc, element) else {
                bail!("the box has no style");
            };
            let lang = lang_value(&doc, element).unwrap_or_else(|| "(none)".to_string());
            writeln!(out, "{} {}", style("style:").bold(), style_name)?;
            writeln!(out, "{} {}", style("lang:").bold(), lang)?;
            let snapshot = read_format_values(&doc, element, &config);
            writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
        }
        Some(("set-size", sub)) => {
            let (mut doc, element) = target(sub)?;
            let size = sub.get_one::<u32>("size").copied().context("missing size")?;
            let mut editor = StyleEditor::new(config).with_author_mode(author);
            editor.change_size_absolute(&mut doc, element, size)?;
            write_user_sheet(out, &doc)?;
        }
        Some((command @ ("bigger" | "smaller"), sub)) => {
            let (mut doc, element) = target(sub)?;
            let mut editor = StyleEditor::new(config).with_author_mode(author);
            if command == "bigger" {
                editor.make_bigger(&mut doc, element);
            } else {
                editor.make_smaller(&mut doc, element);
            }
            write_user_sheet(out, &doc)?;
        }
        Some(("apply-style", sub)) => {
            let (mut doc, element) = target(sub)?;
            let name = sub.get_one::<String>("name").context("missing style name")?;
            let mut editor = StyleEditor::new(config);
            if editor.attach_to_box(&mut doc, element, &host).is_none() {
                bail!("the box has no style");
            }
            let mut session = editor
                .open_format_dialog(&mut doc, &host)
                .context("format dialog unavailable for this box")?;
            session.select_style(&mut doc, name);
            write_user_sheet(out, &doc)?;
        }
        Some(("rule", sub)) => {
            let (mut doc, element) = target(sub)?;
            let Some(style_name) = style_name_for_element(&mut doc, element) else {
                bail!("the box has no style");
            };
            let lang = lang_value(&doc, element);
            let ignore_language = sub.get_flag("ignore-language") || author;
            let rule =
                get_or_create_rule_for_style(&mut doc, &style_name, lang.as_deref(), ignore_language);
            let text = doc.rule(rule).map(|rule| rule.css_text()).unwrap_or_default();
            writeln!(out, "{}", text)?;
        }
        Some((other, _)) => bail!("unknown command '{}'", other),
        None => bail!("no command given"),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli().get_matches();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = run(&matches, &mut out) {
        eprintln!("{} {:#}", style("error:").red().bold(), err);
        std::process::exit(1);
    }
}
