pub mod date_range_query_hydrator;
pub mod order_metrics_source;
pub mod quantile_band_scorer;
pub mod rfm_rank_selector;
pub mod segment_hydrator;
pub mod segmentation_log_side_effect;
