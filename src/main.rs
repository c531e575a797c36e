//! coach - profile and service catalog admin for personal trainers.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;
use std::path::Path;

use clap::{CommandFactory, Parser};
use tracing::debug;

use coach::backup;
use coach::cli::{self, Cli, Commands, ServicesCommand};
use coach::draft::{DraftEditor, Finished};
use coach::editor::{
    Confirm, DeleteEditor, EditorOutcome, FixedAnswer, PatchEditor, ServiceEditor, ServicePatch,
    TerminalConfirm, parse_detail,
};
use coach::error::{AdminError, Result};
use coach::gallery::{self, HERO_GALLERY};
use coach::ingest::ingest_file_async;
use coach::logging::init_logging;
use coach::onboarding::{INITIAL_MESSAGE, OnboardingFlow};
use coach::output::{Output, OutputMode, ProfileView};
use coach::session::{Session, require_dashboard};
use coach::settings::Settings;
use coach::store::{ConfigStore, SqliteStorage};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> Option<&'static str> {
        option_env!("VERGEN_GIT_SHA")
    }

    pub fn build_timestamp() -> Option<&'static str> {
        option_env!("VERGEN_BUILD_TIMESTAMP")
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    let mode = OutputMode::from_cli(&cli);
    let out = mode.into_output();

    if let Err(e) = run(&cli, mode, out.as_ref()) {
        out.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, mode: OutputMode, out: &dyn Output) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    match &cli.command {
        None => cmd_quick_start(cli, &settings, out),
        Some(Commands::Show(args)) => cmd_show(cli, &settings, out, args),
        Some(Commands::Set(args)) => cmd_set(cli, &settings, out, args),
        Some(Commands::Image(args)) => cmd_image(cli, &settings, out, args),
        Some(Commands::Gallery(args)) => cmd_gallery(cli, &settings, out, args),
        Some(Commands::Services(command)) => cmd_services(cli, &settings, mode, out, command),
        Some(Commands::Onboard(args)) => cmd_onboard(cli, &settings, out, args),
        Some(Commands::Reset(args)) => cmd_reset(cli, &settings, mode, out, args),
        Some(Commands::Export(args)) => cmd_export(cli, &settings, out, &args.path),
        Some(Commands::Import(args)) => cmd_import(cli, &settings, out, &args.path),
        Some(Commands::Session) => cmd_session(cli, &settings),
        Some(Commands::Version) => {
            out.version_info(
                build_info::VERSION,
                build_info::git_sha(),
                build_info::build_timestamp(),
            );
            Ok(())
        }
        Some(Commands::Completions(args)) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "coach", &mut io::stdout());
            Ok(())
        }
    }
}

// === Helpers ===

/// Open the store on the database chosen by `--db`, or by the settings.
fn open_store(cli: &Cli, settings: &Settings) -> Result<ConfigStore> {
    let path = match &cli.db {
        Some(path) => path.clone(),
        None => settings.db_path()?,
    };
    debug!(path = %path.display(), "Opening store");
    let storage = SqliteStorage::open(&path)?.with_quota(settings.quota());
    Ok(ConfigStore::open(Box::new(storage)))
}

/// Open the store and make sure onboarding is done.
fn open_dashboard(cli: &Cli, settings: &Settings) -> Result<ConfigStore> {
    let store = open_store(cli, settings)?;
    require_dashboard(store.current())?;
    Ok(store)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Confirmation source for destructive commands. Robot mode never prompts.
fn confirmer(mode: OutputMode, yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(FixedAnswer(true))
    } else if mode.is_robot() {
        Box::new(FixedAnswer(false))
    } else {
        Box::new(TerminalConfirm::default())
    }
}

fn patch_from(fields: &cli::ServiceFields) -> Result<ServicePatch> {
    let mut patch = ServicePatch {
        title: fields.title.clone(),
        tag: fields.tag.clone(),
        duration: fields.duration.clone(),
        image: fields.image.clone(),
        popular: fields.popular,
        ..ServicePatch::default()
    };
    for raw in &fields.details {
        let (key, value) = parse_detail(raw)?;
        patch.details.insert(key, value);
    }
    Ok(patch)
}

// === Commands ===

fn cmd_quick_start(cli: &Cli, settings: &Settings, out: &dyn Output) -> Result<()> {
    let onboarded = open_store(cli, settings).is_ok_and(|store| store.current().is_onboarded);
    out.quick_start(onboarded);
    Ok(())
}

fn cmd_show(cli: &Cli, settings: &Settings, out: &dyn Output, args: &cli::ShowArgs) -> Result<()> {
    let store = open_store(cli, settings)?;
    out.profile(&ProfileView::new(
        store.current(),
        store.revision(),
        store.location(),
        args.full,
    ));
    Ok(())
}

fn cmd_set(cli: &Cli, settings: &Settings, out: &dyn Output, args: &cli::SetArgs) -> Result<()> {
    let mut store = open_dashboard(cli, settings)?;
    let mut draft = DraftEditor::new(&store);
    let changed = draft.set_field(args.field, &args.value)?;
    if changed {
        draft.commit(&mut store)?;
    }
    out.field_set(args.field, &draft.draft().field(args.field), changed);
    Ok(())
}

fn cmd_image(cli: &Cli, settings: &Settings, out: &dyn Output, args: &cli::ImageArgs) -> Result<()> {
    let mut store = open_dashboard(cli, settings)?;
    let image = runtime()?.block_on(ingest_file_async(
        args.path.clone(),
        settings.ingest_options(),
    ))?;

    let mut draft = DraftEditor::new(&store);
    draft.set_image(args.slot, &image);
    draft.commit(&mut store)?;
    out.image_set(args.slot, &image);
    Ok(())
}

fn cmd_gallery(
    cli: &Cli,
    settings: &Settings,
    out: &dyn Output,
    args: &cli::GalleryArgs,
) -> Result<()> {
    let Some(index) = args.select else {
        let current = open_store(cli, settings)
            .ok()
            .and_then(|store| gallery::position_of(&store.current().hero_image));
        out.gallery(HERO_GALLERY, current);
        return Ok(());
    };

    let mut store = open_dashboard(cli, settings)?;
    let mut draft = DraftEditor::new(&store);
    draft.select_gallery_hero(index)?;
    draft.commit(&mut store)?;
    out.hero_selected(index, gallery::get(index)?);
    Ok(())
}

fn cmd_services(
    cli: &Cli,
    settings: &Settings,
    mode: OutputMode,
    out: &dyn Output,
    command: &ServicesCommand,
) -> Result<()> {
    if let ServicesCommand::List = command {
        let store = open_store(cli, settings)?;
        out.service_list(&store.current().services);
        return Ok(());
    }

    let mut store = open_dashboard(cli, settings)?;
    let mut draft = DraftEditor::new(&store);

    match command {
        ServicesCommand::List => Ok(()),
        ServicesCommand::Add(fields) => {
            draft.open_editor(None)?;
            let mut editor = PatchEditor::new(patch_from(fields)?);
            let outcome = editor.edit(draft.editing_service());
            if let Some(e) = editor.take_error() {
                return Err(e);
            }
            save_service(&mut draft, &mut store, out, outcome, true)
        }
        ServicesCommand::Edit(args) => {
            let patch = patch_from(&args.fields)?;
            draft.open_editor(Some(&args.id))?;
            if patch.is_empty() {
                draft.close_editor();
                out.warning("Nothing to change; pass --title, --tag, --duration, --image, --popular or --detail");
                return Ok(());
            }
            let mut editor = PatchEditor::new(patch);
            let outcome = editor.edit(draft.editing_service());
            if let Some(e) = editor.take_error() {
                return Err(e);
            }
            save_service(&mut draft, &mut store, out, outcome, false)
        }
        ServicesCommand::Delete(args) => {
            draft.open_editor(Some(&args.id))?;
            let outcome = DeleteEditor.edit(draft.editing_service());
            let mut confirm = confirmer(mode, args.yes);
            match draft.finish_editing(outcome, &mut store, confirm.as_mut())? {
                Finished::Declined => Err(AdminError::ConfirmationDeclined {
                    action: format!("delete service {}", args.id),
                }),
                _ => {
                    out.service_deleted(&args.id);
                    Ok(())
                }
            }
        }
    }
}

fn save_service(
    draft: &mut DraftEditor,
    store: &mut ConfigStore,
    out: &dyn Output,
    outcome: EditorOutcome,
    created: bool,
) -> Result<()> {
    let EditorOutcome::Save(service) = &outcome else {
        return Ok(());
    };
    let service = service.clone();
    draft.finish_editing(outcome, store, &mut FixedAnswer(false))?;
    out.service_saved(&service, created);
    Ok(())
}

fn cmd_onboard(
    cli: &Cli,
    settings: &Settings,
    out: &dyn Output,
    args: &cli::OnboardArgs,
) -> Result<()> {
    let mut store = open_store(cli, settings)?;
    if store.current().is_onboarded {
        out.warning("Already onboarded. Run `coach reset` to start over.");
        return Ok(());
    }

    let mut draft = DraftEditor::new(&store);
    let mut flow = OnboardingFlow::new(settings.step_interval());
    flow.set_name(&args.name);
    flow.set_phone(&args.phone);
    flow.submit()?;

    out.onboarding_started(INITIAL_MESSAGE);
    runtime()?.block_on(flow.run(&mut store, &mut draft, |step| out.onboarding_step(step)))?;
    out.onboarded(store.current());
    Ok(())
}

fn cmd_reset(
    cli: &Cli,
    settings: &Settings,
    mode: OutputMode,
    out: &dyn Output,
    args: &cli::ResetArgs,
) -> Result<()> {
    let mut store = open_store(cli, settings)?;
    let mut confirm = confirmer(mode, args.yes);
    if !confirm.confirm("Discard the whole profile and restore defaults?") {
        return Err(AdminError::ConfirmationDeclined {
            action: "reset".to_string(),
        });
    }
    let mut draft = DraftEditor::new(&store);
    draft.discard(&mut store)?;
    out.reset_done();
    Ok(())
}

fn cmd_export(cli: &Cli, settings: &Settings, out: &dyn Output, path: &Path) -> Result<()> {
    let store = open_store(cli, settings)?;
    let format = backup::export(store.current(), path)?;
    out.exported(path, format);
    Ok(())
}

fn cmd_import(cli: &Cli, settings: &Settings, out: &dyn Output, path: &Path) -> Result<()> {
    let config = backup::import(path)?;
    let mut store = open_store(cli, settings)?;
    store.replace(config)?;
    out.imported(path, store.current());
    Ok(())
}

fn cmd_session(cli: &Cli, settings: &Settings) -> Result<()> {
    let mut store = open_store(cli, settings)?;
    let stdin = io::stdin();
    Session::new(
        &mut store,
        stdin.lock(),
        io::stdout(),
        settings.ingest_options(),
    )?
    .run()
}
