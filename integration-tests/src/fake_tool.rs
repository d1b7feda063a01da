use std::{
    error::Error,
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

const EXPORT_FLAGS: &[&str] = &["--export-filename=", "--export-png="];

struct Context {
    workdir: PathBuf,
    name: String,
    args: Vec<String>,
}

impl Context {
    fn file(&self, extension: &str) -> PathBuf {
        self.workdir.join(format!("{}.{}", self.name, extension))
    }
}

fn append_args(ctx: &Context) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(ctx.file("args"))?;
    // a single write per invocation keeps concurrent runs from interleaving
    file.write_all(format!("{}\n", ctx.args.join("\t")).as_bytes())
}

fn write_env(ctx: &Context) -> std::io::Result<()> {
    let mut file = File::create(ctx.file("env"))?;
    for (key, value) in std::env::vars() {
        writeln!(file, "{}={}", key, value)?;
    }
    Ok(())
}

fn copy_stdout(ctx: &Context) -> std::io::Result<()> {
    let mut file = File::open(ctx.file("stdout"))?;
    std::io::copy(&mut file, &mut std::io::stdout())?;
    Ok(())
}

fn write_export(ctx: &Context) -> std::io::Result<()> {
    let export = ctx
        .args
        .iter()
        .find_map(|arg| EXPORT_FLAGS.iter().find_map(|flag| arg.strip_prefix(flag)));
    if let Some(path) = export {
        std::fs::write(path, b"PNG")?;
    }
    Ok(())
}

fn append_to_last_arg(ctx: &Context) -> std::io::Result<()> {
    let suffix = std::fs::read(ctx.file("append"))?;
    if let Some(path) = ctx.args.last() {
        OpenOptions::new().append(true).open(path)?.write_all(&suffix)?;
    }
    Ok(())
}

fn get_exit_status(ctx: &Context) -> Result<i32, Box<dyn Error>> {
    if let Ok(pattern) = std::fs::read_to_string(ctx.file("fail-on")) {
        if ctx.args.iter().any(|arg| arg.contains(pattern.trim())) {
            return Ok(1);
        }
    }
    let exit_status = std::fs::read_to_string(ctx.file("exit-status"))?
        .trim()
        .parse()?;
    Ok(exit_status)
}

fn context() -> Option<Context> {
    let exe = std::env::current_exe().ok()?;
    let workdir = exe.parent()?.to_owned();
    let name = Path::new(exe.file_stem()?).to_string_lossy().into_owned();
    Some(Context {
        workdir,
        name,
        args: std::env::args().skip(1).collect(),
    })
}

/// Entry point of the stand-in for the rasterizer and optimizer. Behavior is
/// driven by `<name>.*` files next to the executable.
pub fn fake_tool_main() {
    let ctx = match context() {
        Some(ctx) => ctx,
        None => std::process::exit(101),
    };
    let _ = append_args(&ctx);
    let _ = write_env(&ctx);
    let _ = copy_stdout(&ctx);
    let _ = write_export(&ctx);
    let _ = append_to_last_arg(&ctx);

    let exit_status = get_exit_status(&ctx).unwrap_or(0);
    std::process::exit(exit_status);
}
