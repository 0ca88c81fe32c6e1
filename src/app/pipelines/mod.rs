pub mod hours_pipeline;
