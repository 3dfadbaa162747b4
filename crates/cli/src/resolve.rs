use crate::LaunchArgs;
use modlift_core::plan::{LaunchPlan, ModuleKind};

pub fn run(args: &LaunchArgs, json: bool) -> i32 {
    let session = args.session();
    let outcome = session.resolve();

    if json {
        match outcome.report.to_json() {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("error: {e}");
                return crate::RESOLUTION_FAILURE;
            }
        }
    } else {
        print!("{}", outcome.report);
    }

    match outcome.resolved {
        Ok(resolved) => {
            if !json {
                print_plan(&resolved.plan);
            }
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            crate::RESOLUTION_FAILURE
        }
    }
}

fn print_plan(plan: &LaunchPlan) {
    println!(
        "launch plan: {} in module {} ({:?} delegation)",
        plan.entry_point, plan.entry_module, plan.delegation
    );
    for module in &plan.modules {
        let kind = match module.kind {
            ModuleKind::Explicit => "explicit",
            ModuleKind::Automatic => "automatic",
            ModuleKind::Demoted => "demoted",
        };
        println!("  {} ({}) {}", module.name, kind, module.path.display());
    }
}
