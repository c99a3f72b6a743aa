// Test fixtures: served folders and fake kernels

use std::fs;

use tempfile::TempDir;
use wlweb::core::config::KernelConfig;

/// Folder with kernel scripts and a static asset
///
/// ```text
/// index.wl
/// api/index.wl
/// api/report.m
/// style.css
/// ```
pub fn create_site() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("index.wl"), "\"<h1>Home</h1>\"").unwrap();
    fs::create_dir(dir.path().join("api")).unwrap();
    fs::write(
        dir.path().join("api").join("index.wl"),
        "APIFunction[{\"x\" -> \"String\"}, Identity, \"JSON\"]",
    )
    .unwrap();
    fs::write(dir.path().join("api").join("report.m"), "ExportForm[1, \"JSON\"]").unwrap();
    fs::write(dir.path().join("style.css"), "body { color: red; }").unwrap();
    dir
}

/// What a fake kernel does once it has answered its quota of requests
#[derive(Debug, Clone, Copy)]
pub enum AfterLimit {
    /// Exit with status 3 without answering
    Exit,
    /// Keep reading input and never answer again
    Hang,
}

/// Shell loop standing in for WolframKernel
///
/// Answers each request line with a stale reply (to be discarded), a
/// noise line, then the real reply whose result is `<pid> <seq>`.
/// `Quit[]` makes it exit. A line carrying two request tags (a truncated
/// request glued to the next one) is a syntax error and gets no reply.
/// The `$Version` handshake counts as the first request; after `limit`
/// requests the kernel does what `after` says.
pub fn fake_kernel(limit: Option<usize>, after: AfterLimit, delay: Option<&str>) -> String {
    let limit = limit.map(|n| n.to_string()).unwrap_or_default();
    let after = match after {
        AfterLimit::Exit => "exit 3",
        AfterLimit::Hang => "while IFS= read -r _; do :; done",
    };
    let delay = delay.map(|d| format!("sleep {d}")).unwrap_or_default();

    format!(
        r#"
count=0
while IFS= read -r line; do
  case "$line" in
    Quit*) exit 0 ;;
    *'<wlweb-reply:'*'<wlweb-reply:'*)
      printf 'Syntax::sntx: Invalid syntax in or before request\n'
      continue ;;
  esac
  count=$((count + 1))
  if [ -n "{limit}" ] && [ "$count" -gt "{limit}" ]; then
    {after}
  fi
  {delay}
  seq=$(printf '%s\n' "$line" | sed -n 's/.*<wlweb-reply:\([0-9]*\)>.*/\1/p')
  printf '<wlweb-reply:999999>{{"Result":"stale","Messages":[]}}\n'
  printf 'Kernel noise\n'
  printf '<wlweb-reply:%s>{{"Result":"%s %s","Messages":[]}}\n' "$seq" "$$" "$seq"
done
"#
    )
}

/// Well-behaved fake kernel
pub fn answering_kernel() -> String {
    fake_kernel(None, AfterLimit::Exit, None)
}

/// Kernel configuration running `script` through `sh -c`
pub fn fake_kernel_config(script: &str) -> KernelConfig {
    KernelConfig {
        path: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        poolsize: 1,
        startup_timeout_sec: 10,
        evaluation_timeout_sec: 10,
    }
}
