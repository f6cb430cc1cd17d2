use c2fortran::emit;
use c2fortran::model;
use c2fortran::DeclTree;

use std::error::Error;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use structopt::StructOpt;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate Fortran ISO_C_BINDING interfaces from C declarations
#[derive(StructOpt)]
struct Opts {
    /// C source file, or directory of C source files, to translate
    #[structopt(parse(from_os_str))]
    input: Option<PathBuf>,

    /// Write Fortran to this file instead of stdout
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Include directory for the C front end
    #[structopt(short = "I", parse(from_os_str), number_of_values = 1)]
    include: Vec<PathBuf>,

    /// Macro definition for the C front end
    #[structopt(short = "D", number_of_values = 1)]
    define: Vec<String>,

    /// Extra argument for the C front end
    #[structopt(long, number_of_values = 1, allow_hyphen_values = true)]
    clang_arg: Vec<String>,

    /// Also translate declarations from #included files
    #[structopt(long)]
    include_headers: bool,

    /// Read INPUT as declarations saved with --save-model instead of C source
    #[structopt(long)]
    from_model: bool,

    /// Save the loaded declarations to this file
    #[structopt(long, parse(from_os_str))]
    save_model: Option<PathBuf>,

    /// Log debug information to stderr
    #[structopt(short, long)]
    verbose: bool,
}

fn main() {
    let opts = Opts::from_args();

    // Keep stdout for Fortran
    let filter = if opts.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(opts) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(opts: Opts) -> Result<(), Box<dyn Error>> {
    match &opts.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            translate(&opts, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            translate(&opts, &mut out)?;
        }
    }

    Ok(())
}

/// Load INPUT and write its Fortran to `out`, nothing without an INPUT
fn translate<W: Write>(opts: &Opts, out: &mut W) -> Result<(), Box<dyn Error>> {
    let input = match &opts.input {
        Some(input) => input,
        None => return Ok(()),
    };

    let trees = if opts.from_model {
        model::load(input)?
    } else {
        load_source(input, opts)?
    };

    if let Some(path) = &opts.save_model {
        model::save(path, &trees)?;
        info!("Saved {} declaration trees to {}", trees.len(), path.display());
    }

    emit::emit_all(&trees, out)?;
    Ok(())
}

#[cfg(feature = "loader")]
fn load_source(input: &Path, opts: &Opts) -> Result<Vec<DeclTree>, Box<dyn Error>> {
    let options = c2fortran::loader::Options {
        include_paths: opts.include.clone(),
        defines: opts.define.clone(),
        clang_args: opts.clang_arg.clone(),
        include_headers: opts.include_headers,
    };
    Ok(c2fortran::loader::load(input, &options)?)
}

#[cfg(not(feature = "loader"))]
fn load_source(input: &Path, _opts: &Opts) -> Result<Vec<DeclTree>, Box<dyn Error>> {
    Err(format!(
        "cannot parse {}: built without the `loader` feature, use --from-model",
        input.display()
    )
    .into())
}
