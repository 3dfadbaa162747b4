use crate::LaunchArgs;
use modlift_core::launcher::Launcher;
use tracing::info;

pub fn run(args: &LaunchArgs) -> i32 {
    let session = args.session();
    let outcome = session.resolve();

    // The report goes to stderr either way; stdout belongs to the
    // diagnostics lines and the launched program.
    if !outcome.report.is_clean() {
        eprint!("{}", outcome.report);
    }

    match outcome.resolved {
        Ok(resolved) => {
            info!(
                "launching {} from {} modules",
                session.entry_point(),
                resolved.plan.modules.len()
            );
            let launcher = Launcher::from_env(session.config().diagnostics);
            match launcher.launch(&resolved.plan, &resolved.resolution.events) {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("error: {e}");
                    crate::RESOLUTION_FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            crate::RESOLUTION_FAILURE
        }
    }
}
