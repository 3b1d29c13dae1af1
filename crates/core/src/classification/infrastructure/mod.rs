pub mod age_net_classifier;
