mod geometry_properties;
mod topology_properties;
