//! Shared fixtures for tests across the workspace
//!
//! Small exchange files covering the shapes the forest has to deal with. Kept in the
//! library (not behind `cfg(test)`) so the CLI and viewer crates can use them too.

/// A well-formed file: header section, shared references, no cycles
pub const SAMPLE_EXCHANGE_FILE: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('wall.ifc','2024-05-01T10:00:00',(''),(''),'stepview','stepview','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',#2,'Project',$,$,$,$,(#7),#8);
#2=IFCOWNERHISTORY(#3,#4,$,.ADDED.,$,$,$,0);
#3=IFCPERSONANDORGANIZATION(#5,#6,$);
#4=IFCAPPLICATION(#6,'1.0','stepview','stepview');
#5=IFCPERSON($,'Doe','John',$,$,$,$,$);
#6=IFCORGANIZATION($,'Acme',$,$,$);
#7=IFCGEOMETRICREPRESENTATIONCONTEXT($,'Model',3,1.E-05,#9,$);
#8=IFCUNITASSIGNMENT((#10));
#9=IFCAXIS2PLACEMENT3D(#11,$,$);
#10=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
#11=IFCCARTESIANPOINT((0.,0.,0.));
ENDSEC;
END-ISO-10303-21;
";

/// Two records referencing each other, reachable from a third
pub const CYCLIC_FILE: &str = "#1=A(#2);
#2=B(#1);
#3=C(#1);
";

/// Line index of `#id=` in [SAMPLE_EXCHANGE_FILE]
pub fn sample_line_of(identifier: u64) -> usize {
    // the DATA section starts on line 7 and declares #1..#11 in order
    6 + identifier as usize
}
