use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use indoc::indoc;
use log::{LevelFilter, debug, warn};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use pubwire::canonical::{content_hash, to_canonical_string};
use pubwire::model::opds1::Feed;
use pubwire::model::{ManifestSection, OpdsFeed, Publication, Smil};
use pubwire::{Mapped, Mapper, MapperSettings, Model};

use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::exit;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Manifest,
    Opds2,
    Opds1,
    Smil,
}

impl DocumentKind {
    /// `.json` is a manifest, `.smil` a media overlay, anything else an OPDS 1 feed.
    fn infer(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => DocumentKind::Manifest,
            Some("smil") => DocumentKind::Smil,
            _ => DocumentKind::Opds1,
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "manifest" => Ok(DocumentKind::Manifest),
            "opds2" => Ok(DocumentKind::Opds2),
            "opds1" => Ok(DocumentKind::Opds1),
            "smil" => Ok(DocumentKind::Smil),
            other => Err(format!("unknown document kind `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Json,
    Canonical,
    Hash,
}

struct PubwireDump {
    mapper: Mapper,
    input: PathBuf,
    kind: DocumentKind,
    section: Option<ManifestSection>,
    output_mode: OutputMode,
    verbosity_level: LevelFilter,
}

impl PubwireDump {
    pub fn from_cli_matches(matches: &ArgMatches) -> Result<Self> {
        let input = PathBuf::from(
            matches
                .get_one::<String>("INPUT")
                .context("INPUT is a required argument")?,
        );

        let kind = match matches.get_one::<String>("kind") {
            Some(kind) => DocumentKind::from_str(kind).map_err(anyhow::Error::msg)?,
            None => DocumentKind::infer(&input),
        };

        let section = match matches.get_one::<String>("section") {
            Some(section) => {
                if kind != DocumentKind::Manifest {
                    bail!("`--section` only applies to publication manifests");
                }
                Some(ManifestSection::from_str(section).map_err(anyhow::Error::msg)?)
            }
            None => None,
        };

        let output_mode = match (matches.get_flag("hash"), matches.get_flag("canonical")) {
            (true, _) => OutputMode::Hash,
            (false, true) => OutputMode::Canonical,
            (false, false) => OutputMode::Json,
        };

        let max_depth = matches
            .get_one::<usize>("max-depth")
            .copied()
            .unwrap_or(pubwire::mapper::DEFAULT_MAX_DEPTH);

        let verbosity_level = match matches.get_count("verbose") {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            3 => LevelFilter::Trace,
            _ => {
                eprintln!("using more than -vvv does not affect verbosity level");
                LevelFilter::Trace
            }
        };

        let settings = MapperSettings::new()
            .max_depth(max_depth)
            .collapse_single_item_collections(!matches.get_flag("keep-single-item-arrays"))
            .indent(!matches.get_flag("no-indent"));

        Ok(PubwireDump {
            mapper: Mapper::new().with_configuration(settings),
            input,
            kind,
            section,
            output_mode,
            verbosity_level,
        })
    }

    pub fn run(&self) -> Result<()> {
        self.try_to_initialize_logging();

        let text = fs::read_to_string(&self.input)
            .with_context(|| format!("Failed to read `{}`", self.input.display()))?;
        debug!("read {} bytes from `{}`", text.len(), self.input.display());

        let mapped = match self.kind {
            DocumentKind::Manifest => {
                let publication = self.mapper.deserialize_str::<Publication>(&text)?;
                self.report(&publication);
                let section = self.section.unwrap_or(ManifestSection::All);
                publication.value.section(&self.mapper, section)?
            }
            DocumentKind::Opds2 => self.json_roundtrip::<OpdsFeed>(&text)?,
            DocumentKind::Opds1 => self.xml_to_json::<Feed>(&text)?,
            DocumentKind::Smil => self.xml_to_json::<Smil>(&text)?,
        };
        self.report(&mapped);

        let rendered = match self.output_mode {
            OutputMode::Hash => content_hash(&mapped.value)?,
            OutputMode::Canonical => to_canonical_string(&mapped.value)?,
            OutputMode::Json if self.mapper.settings().should_indent() => {
                serde_json::to_string_pretty(&mapped.value)?
            }
            OutputMode::Json => serde_json::to_string(&mapped.value)?,
        };

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", rendered).context("Failed to write output")?;
        Ok(())
    }

    fn json_roundtrip<T: Model>(&self, text: &str) -> Result<Mapped<Value>> {
        let document = self.mapper.deserialize_str::<T>(text)?;
        self.report(&document);
        Ok(self.mapper.serialize(&document.value)?)
    }

    fn xml_to_json<T: Model>(&self, text: &str) -> Result<Mapped<Value>> {
        let document = self.mapper.deserialize_xml::<T>(text)?;
        self.report(&document);
        Ok(self.mapper.serialize(&document.value)?)
    }

    fn report<T>(&self, mapped: &Mapped<T>) {
        if !mapped.is_clean() {
            warn!(
                "`{}`: {} field issue(s), output is partial",
                self.input.display(),
                mapped.issues.len()
            );
        }
    }

    fn try_to_initialize_logging(&self) {
        if let Err(e) = TermLogger::init(
            self.verbosity_level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ) {
            eprintln!("Failed to initialize logging: {}", e);
        }
    }
}

fn command() -> Command {
    Command::new("pubwire_dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Maps publication manifests, OPDS feeds and SMIL overlays to JSON")
        .arg(Arg::new("INPUT").required(true).value_name("INPUT"))
        .arg(
            Arg::new("kind")
                .long("kind")
                .short('k')
                .value_parser(["manifest", "opds2", "opds1", "smil"])
                .help("Sets the input document kind")
                .long_help(indoc!(r#"
                    Sets the input document kind:
                        "manifest" - web publication manifest (JSON)
                        "opds2"    - OPDS 2 feed (JSON)
                        "opds1"    - OPDS 1 Atom feed (XML)
                        "smil"     - SMIL media overlay (XML)

                    When omitted, `.json` files are read as manifests, `.smil` files
                    as media overlays and everything else as OPDS 1 feeds.
                "#)),
        )
        .arg(
            Arg::new("section")
                .long("section")
                .short('s')
                .value_parser(ManifestSection::NAMES)
                .help("Only prints one section of a manifest"),
        )
        .arg(
            Arg::new("canonical")
                .long("canonical")
                .action(ArgAction::SetTrue)
                .help("Prints compact JSON with sorted keys"),
        )
        .arg(
            Arg::new("hash")
                .long("hash")
                .action(ArgAction::SetTrue)
                .help("Prints the SHA-256 of the canonical JSON instead of the document"),
        )
        .arg(
            Arg::new("no-indent")
                .long("no-indent")
                .action(ArgAction::SetTrue)
                .help("When set, output will not be indented."),
        )
        .arg(
            Arg::new("keep-single-item-arrays")
                .long("keep-single-item-arrays")
                .action(ArgAction::SetTrue)
                .help("Writes one-element collections as arrays instead of bare values"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_parser(clap::value_parser!(usize))
                .help("Deepest object nesting to follow"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("-v - info, -vv - debug, -vvv - trace."),
        )
}

fn main() {
    let matches = command().get_matches();

    let result = PubwireDump::from_cli_matches(&matches).and_then(|app| app.run());
    if let Err(e) = result {
        eprintln!("{:?}", e);
        exit(1);
    }
}
