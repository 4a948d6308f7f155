//! Run the repair pipeline over a few typical raw model outputs
//!
//! No model is needed: this is the offline half of the pipeline.

use matchagen::prompt::prepare;
use matchagen::{repair_output, Inspiration, RuleSet};

fn main() {
    let rules = RuleSet::default();
    let prompt = prepare(&Inspiration::from("mango, protein powder"), &rules);
    println!("Model input: {}\n", prompt.model_input());

    let outputs = [
        // the model forgets the theme and two ingredients
        "<pad> title: Mango Smoothie <section> ingredients: mango <sep> protein powder \
         <section> directions: Blend mango with ice.</s>",
        // the model drifts into baking
        "title: Mango Bread <section> ingredients: mango <sep> flour <section> \
         directions: Preheat oven to 350 <sep> Bake 25 30 minutes.",
        // the model produces nothing usable
        "<pad> mango mango mango</s>",
    ];

    for raw in outputs {
        println!("=== Raw ===\n{}\n", raw);
        println!("=== Repaired ===\n{}\n", repair_output(raw, &prompt.ingredients));
    }
}
