use std::time::Duration;

use clap::{Parser, ValueEnum};
use sp2150::sp2150_client::{DEFAULT_TIMEOUT_MS, SP2150_BAUD};
use sp2150::*;

/// The operations the command line can invoke.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
enum Function {
    SetScanSpeed,
    GetScanSpeed,
    ScanToWavelength,
    GotoWavelength,
    GetWavelength,
    SetGrating,
    GetGrating,
    SetTurret,
    GetTurret,
    GetGratingInfo,
    GetTurretInfo,
    SetFilter,
    GetFilter,
    HomeFilter,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Function to call.
    #[arg(value_enum)]
    function: Function,

    /// Instrument resource name, e.g. ASRL2::INSTR or /dev/ttyUSB0.
    #[arg(short = 'n', long)]
    resource_name: Option<String>,

    /// Parameter for function, i.e. wavelength in nm, scan speed in nm/min, grating number,
    /// turret number, filter number.
    #[arg(short, long)]
    parameter: Option<String>,

    // Use the in-memory instrument instead of hardware.
    #[arg(long = "virtual", default_value_t = false)]
    virtual_instrument: bool,

    #[arg(long, default_value_t = SP2150_BAUD)]
    baud_rate: u32,

    // Read timeout per command. Long scans need more than the default.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
}

/// Invoke `function` on `mono`, returning the text to print for getters.
fn dispatch(
    mono: &mut dyn Monochromator,
    function: Function,
    parameter: Option<&str>,
) -> Result<Option<String>, Sp2150Error> {
    log::debug!("Calling {:?} with parameter {:?}", function, parameter);

    let output = match function {
        Function::SetScanSpeed => {
            mono.set_scan_speed(coerce_float(parameter)?)?;
            None
        }
        Function::GetScanSpeed => Some(format!("{:?}", mono.scan_speed()?)),
        Function::ScanToWavelength => {
            mono.scan_to_wavelength(coerce_float(parameter)?)?;
            None
        }
        Function::GotoWavelength => {
            mono.set_wavelength(coerce_float(parameter)?)?;
            None
        }
        Function::GetWavelength => Some(format!("{:?}", mono.wavelength()?)),
        Function::SetGrating => {
            mono.set_grating(coerce_index(parameter)?)?;
            None
        }
        Function::GetGrating => Some(mono.grating()?.to_string()),
        Function::SetTurret => {
            mono.set_turret(coerce_index(parameter)?)?;
            None
        }
        Function::GetTurret => Some(mono.turret()?.to_string()),
        Function::GetGratingInfo => Some(mono.grating_info()?),
        Function::GetTurretInfo => Some(mono.turret_info()?),
        Function::SetFilter => {
            mono.set_filter(coerce_index(parameter)?)?;
            None
        }
        Function::GetFilter => Some(mono.filter()?.to_string()),
        Function::HomeFilter => {
            mono.home_filter()?;
            None
        }
    };
    Ok(output)
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let parameter = args.parameter.as_deref();

    let result = if args.virtual_instrument {
        let mut mono = VirtualSp2150::connect(args.resource_name.as_deref().unwrap_or("virtual"));
        let result = dispatch(&mut mono, args.function, parameter);
        mono.disconnect();
        result
    } else {
        let resource_name = args.resource_name.as_deref().unwrap_or_else(|| {
            eprintln!("A resource name (-n/--resource-name) is required to talk to hardware.");
            std::process::exit(1);
        });
        let options = SerialOptions {
            baud_rate: args.baud_rate,
            timeout: Duration::from_millis(args.timeout_ms),
            ..SerialOptions::default()
        };
        // Scoped so the port is closed on every path.
        Sp2150::with(resource_name, &options, |mono| {
            dispatch(mono, args.function, parameter)
        })
    };

    match result {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error calling {:?}: {e}", args.function);
            std::process::exit(1);
        }
    }
}
