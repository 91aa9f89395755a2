mod father_daughter_tests;
