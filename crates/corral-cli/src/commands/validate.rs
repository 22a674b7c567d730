//! `corral validate` — parse a workflow file without executing it.

use std::path::Path;

use corral_core::workflow::schema::Workflow;

pub fn run(file: &str) -> Result<(), String> {
    let workflow = Workflow::from_file(Path::new(file)).map_err(|e| e.to_string())?;

    println!("✅ Workflow '{}' is valid", file);
    println!("   Tasks:  {}", workflow.tasks.len());
    println!("   Agents: {}", workflow.agents.len());

    for (i, task) in workflow.tasks.iter().enumerate() {
        match &task.agent {
            Some(agent) if workflow.agent_spec(agent).is_some() => {
                println!("   {}. {} (agent: {})", i + 1, task.name, agent);
            }
            Some(agent) => {
                println!(
                    "   {}. {} (agent: {} — not declared, will be skipped)",
                    i + 1,
                    task.name,
                    agent
                );
            }
            None => println!("   {}. {} (local)", i + 1, task.name),
        }
    }

    Ok(())
}
