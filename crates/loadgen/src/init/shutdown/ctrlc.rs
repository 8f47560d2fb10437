use anyhow::{Result, anyhow};

pub fn init() -> Result<ctrlc2::AsyncCtrlC> {
    let ctrlc = ctrlc2::AsyncCtrlC::new(move || {
        println!("Ctrl-C received! Ready to exiting...");
        true
    })
    .map_err(|e| anyhow!("install async ctrl-c handler: {e}"))?;
    Ok(ctrlc)
}
