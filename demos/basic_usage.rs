use tweetrank::{Record, SearchEngine, SearchOptions};

fn main() {
    println!("=== tweetrank Basic Usage Example ===\n");

    let records = vec![
        Record::new("1".to_string(), "India beat Pakistan by six wickets".to_string())
            .with_username("cricinfo".to_string())
            .with_counts(1200, 85, 410),
        Record::new("2".to_string(), "Six six six! Rohit is on fire against Pakistan".to_string())
            .with_username("fan_zone".to_string())
            .with_counts(300, 12, 40),
        Record::new("3".to_string(), "Rain delays the start in Colombo".to_string())
            .with_username("weather_watch".to_string()),
        Record::new("4".to_string(), "Babar wins the toss and bats first".to_string())
            .with_username("pcb".to_string()),
    ];

    let engine = SearchEngine::new(records);

    println!("--- Example 1: Search for 'six pakistan' ---");
    let result = engine.search("six pakistan", &SearchOptions::default());
    println!("Found {} records in {:?}", result.total, result.elapsed);
    for (i, scored) in result.results.iter().enumerate() {
        println!("\n{}. [Score: {:.4}] @{}", i + 1, scored.score, scored.record.username);
        println!("   {}", scored.record.text());
    }

    println!("\n\n--- Example 2: Explain the top hit for 'six' ---");
    let options = SearchOptions {
        explain: true,
        ..Default::default()
    };
    let result = engine.search("six", &options);
    if let Some(top) = result.results.first() {
        for (term, weight) in top.breakdown.iter().flatten() {
            println!("  {:<12} {:.4}", term, weight);
        }
    }

    println!("\n\n--- Example 3: Empty query lists every record ---");
    let result = engine.search("", &SearchOptions::default());
    println!("Found {} records", result.total);

    println!("\n\n--- Example 4: Index Statistics ---");
    let stats = engine.stats();
    println!("Total documents: {}", stats.total_documents);
    println!("Total unique terms: {}", stats.total_terms);
    println!("Average docs per term: {:.2}", stats.avg_docs_per_term);

    println!("\n=== Example Complete ===");
}
