use anyhow::{Context, Result};
use colored::*;
use reqwest::Client;
use serde_json::{json, Value};
use std::io::{self, Write};

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚚 Fleet Manager Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());

    let base_url = std::env::var("FLEET_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let client = Client::new();
    println!("{} {}", "🌐 API:".bright_blue(), base_url);

    check_health(&client, &base_url).await?;

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 📊 Estadísticas del dashboard");
        println!("2. 🚗 Listar vehículos");
        println!("3. ✅ Validar toda la flota");
        println!("4. 💬 Preguntar al asistente");
        println!("5. 🚪 Salir");
        print!("{}", "Selecciona una opción (1-5): ".bright_yellow());
        io::stdout().flush()?;

        let choice = read_line()?;
        let result = match choice.as_str() {
            "1" => show_stats(&client, &base_url).await,
            "2" => list_vehicles(&client, &base_url).await,
            "3" => validate_fleet(&client, &base_url).await,
            "4" => ask_assistant(&client, &base_url).await,
            "5" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{} {:#}", "❌ Error:".bright_red(), e);
        }
    }

    Ok(())
}

fn read_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn get_json(client: &Client, url: &str) -> Result<Value> {
    let response = client.get(url).send().await.with_context(|| format!("GET {}", url))?;
    let status = response.status();
    let body: Value = response.json().await?;
    if !status.is_success() {
        anyhow::bail!("{} -> {}: {}", url, status, body);
    }
    Ok(body)
}

async fn post_json(client: &Client, url: &str, payload: Value) -> Result<Value> {
    let response = client
        .post(url)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("POST {}", url))?;
    let status = response.status();
    let body: Value = response.json().await?;
    if !status.is_success() {
        anyhow::bail!("{} -> {}: {}", url, status, body);
    }
    Ok(body)
}

async fn check_health(client: &Client, base_url: &str) -> Result<()> {
    let health = get_json(client, &format!("{}/health", base_url)).await?;
    println!(
        "{} storage: {}, versión: {}",
        "✅ Servidor disponible -".bright_green(),
        health["storage"].as_str().unwrap_or("?"),
        health["version"].as_str().unwrap_or("?")
    );
    Ok(())
}

async fn show_stats(client: &Client, base_url: &str) -> Result<()> {
    let stats = get_json(client, &format!("{}/api/dashboard/stats", base_url)).await?;

    println!();
    println!("{}", "📊 ESTADÍSTICAS".bright_cyan().bold());
    println!("Vehículos: {}", stats["totalVehicles"]);
    println!("  operativos: {}", stats["operational"].to_string().bright_green());
    println!("  mantenimiento pendiente: {}", stats["maintenanceDue"].to_string().bright_yellow());
    println!("  en reparación: {}", stats["inRepair"].to_string().bright_red());
    println!("Piezas: {}", stats["totalParts"]);
    println!("  en stock: {}", stats["partsInStock"]);
    println!("  stock bajo: {}", stats["partsLowStock"]);
    println!("  agotadas: {}", stats["partsOutOfStock"]);
    println!("Alertas sin leer: {}", stats["unreadAlerts"]);
    Ok(())
}

fn colored_status(status: &str) -> ColoredString {
    match status {
        "operational" => status.bright_green(),
        "maintenance_due" => status.bright_yellow(),
        _ => status.bright_red(),
    }
}

async fn list_vehicles(client: &Client, base_url: &str) -> Result<()> {
    let vehicles = get_json(client, &format!("{}/api/vehicles", base_url)).await?;
    let vehicles = vehicles.as_array().cloned().unwrap_or_default();

    println!();
    println!("{}", format!("🚗 {} VEHÍCULOS", vehicles.len()).bright_cyan().bold());
    for vehicle in vehicles {
        println!(
            "#{} {} {} {} - {} km - {}",
            vehicle["id"],
            vehicle["plate"].as_str().unwrap_or("?"),
            vehicle["make"].as_str().unwrap_or("?"),
            vehicle["model"].as_str().unwrap_or("?"),
            vehicle["mileage"],
            colored_status(vehicle["status"].as_str().unwrap_or("?"))
        );
    }
    Ok(())
}

async fn validate_fleet(client: &Client, base_url: &str) -> Result<()> {
    let response = post_json(client, &format!("{}/api/vehicles/validate-all", base_url), json!({})).await?;
    let summary = &response["data"];

    println!();
    println!("{}", "✅ VALIDACIÓN DE LA FLOTA".bright_cyan().bold());
    println!(
        "Validados: {} - cambios: {}",
        summary["validated"], summary["changed"]
    );
    for result in summary["results"].as_array().cloned().unwrap_or_default() {
        let marker = if result["changed"] == true { "🔄" } else { "  " };
        println!(
            "{} {}: {} -> {}",
            marker,
            result["plate"].as_str().unwrap_or("?"),
            result["previousStatus"].as_str().unwrap_or("?"),
            colored_status(result["validation"]["status"].as_str().unwrap_or("?"))
        );
        for reason in result["validation"]["reasons"].as_array().cloned().unwrap_or_default() {
            println!("     · {}", reason.as_str().unwrap_or(""));
        }
    }
    Ok(())
}

async fn ask_assistant(client: &Client, base_url: &str) -> Result<()> {
    println!("Acciones: vehicle-status, maintenance-alerts, parts-inventory, schedule-maintenance");
    print!("{}", "Pregunta o acción: ".bright_yellow());
    io::stdout().flush()?;
    let input = read_line()?;

    let actions = ["vehicle-status", "maintenance-alerts", "parts-inventory", "schedule-maintenance"];
    let payload = if actions.contains(&input.as_str()) {
        json!({ "action": input })
    } else {
        json!({ "message": input })
    };

    let response = post_json(client, &format!("{}/api/chat/query", base_url), payload).await?;
    println!();
    println!("{}", "💬 Respuesta:".bright_blue());
    println!("{}", response["response"].as_str().unwrap_or(""));
    Ok(())
}
